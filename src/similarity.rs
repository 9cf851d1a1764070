// src/similarity.rs

use log::debug;

use crate::models::{Provider, ProviderId};

// Heuristic similarity contributions when no clustering is available
const SAME_CATEGORY_POINTS: i32 = 3;
const SAME_DISTRICT_POINTS: i32 = 2;
const CLOSE_RATING_POINTS: i32 = 1;
const CLOSE_RATING_TOLERANCE: f64 = 1.0;

/// Finds providers similar to the given one.
///
/// With a cluster assignment on the target, similarity is cluster
/// membership: other members of the same cluster sorted by descending
/// score. Without one (clustering never ran), a heuristic feature score is
/// used instead. An unknown id yields an empty result, not an error.
pub fn find_similar(providers: &[Provider], provider_id: &ProviderId, limit: usize) -> Vec<Provider> {
    let target = match providers.iter().find(|p| &p.id == provider_id) {
        Some(p) => p,
        None => {
            debug!("Similarity lookup for unknown provider {}", provider_id.0);
            return Vec::new();
        }
    };

    match target.cluster {
        Some(cluster) => similar_by_cluster(providers, target, cluster, limit),
        None => similar_by_features(providers, target, limit),
    }
}

fn similar_by_cluster(
    providers: &[Provider],
    target: &Provider,
    cluster: usize,
    limit: usize,
) -> Vec<Provider> {
    let mut members: Vec<&Provider> = providers
        .iter()
        .filter(|p| p.cluster == Some(cluster) && p.id != target.id)
        .collect();
    members.sort_by(|a, b| b.score.total_cmp(&a.score));
    members.into_iter().take(limit).cloned().collect()
}

// Fallback when clustering never ran: exact category and district matches
// dominate, a close rating contributes one extra point. The sort is stable,
// so ties keep the original provider order.
fn similar_by_features(providers: &[Provider], target: &Provider, limit: usize) -> Vec<Provider> {
    let mut scored: Vec<(&Provider, i32)> = providers
        .iter()
        .filter(|p| p.id != target.id)
        .map(|p| {
            let mut similarity = 0;
            if p.category == target.category {
                similarity += SAME_CATEGORY_POINTS;
            }
            if p.district == target.district {
                similarity += SAME_DISTRICT_POINTS;
            }
            if (p.rating - target.rating).abs() <= CLOSE_RATING_TOLERANCE {
                similarity += CLOSE_RATING_POINTS;
            }
            (p, similarity)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(limit)
        .map(|(p, _)| p.clone())
        .collect()
}
