// tests/recommendation_flow.rs
//
// End-to-end coverage of the recommendation engine: load -> cluster ->
// score -> filter -> rank, plus the personalization, booking, availability
// and reward entry points the request layer drives.

use recommend_lib::config::{
    DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_REWARD_DELTA, DEFAULT_SIMILAR_LIMIT,
    VIEW_PROVIDER_INTERACTION,
};
use recommend_lib::{
    InteractionData, Preferences, Provider, ProviderId, RecommendationEngine, UserId,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn provider(
    id: &str,
    category: &str,
    district: &str,
    rating: f64,
    experience: u32,
    verified: bool,
) -> Provider {
    let mut p = Provider::new(id, category, district);
    p.rating = rating;
    p.experience = experience;
    p.verified = verified;
    p
}

fn marketplace() -> Vec<Provider> {
    vec![
        provider("p1", "plumbing", "Salem", 4.9, 15, true),
        provider("p2", "plumbing", "Erode", 3.8, 4, false),
        provider("p3", "plumbing", "Salem", 4.2, 7, true),
        provider("p4", "electrical", "Salem", 4.6, 11, true),
        provider("p5", "electrical", "Coimbatore", 3.1, 2, false),
        provider("p6", "cleaning", "Erode", 2.9, 1, false),
        provider("p7", "cleaning", "Namakkal", 4.0, 6, true),
        provider("p8", "catering", "Salem", 3.5, 3, false),
    ]
}

#[test]
fn full_pass_scores_ranks_and_respects_limit() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());

    let results = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    assert_eq!(results.len(), 8);

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score, "not sorted by score");
    }
    for p in &results {
        // One decimal place, always
        assert!(((p.score * 10.0).round() / 10.0 - p.score).abs() < 1e-9);
        assert!(p.cluster.is_some(), "clustering did not run lazily");
    }

    let truncated = engine.recommend(None, None, 3);
    assert_eq!(truncated.len(), 3);
}

#[test]
fn filters_compose_and_results_are_a_subset() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());

    let prefs = Preferences {
        category: Some("plumbing".to_string()),
        min_rating: Some(4.0),
        ..Default::default()
    };
    let results = engine.recommend(Some(&prefs), None, DEFAULT_RECOMMENDATION_LIMIT);
    let ids: Vec<_> = results.iter().map(|p| p.id.0.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p3"]);
}

#[test]
fn repeated_clustering_is_stable_on_unchanged_providers() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());

    engine.fit_clusters();
    let first: Vec<_> = engine.providers().iter().map(|p| p.cluster).collect();
    engine.fit_clusters();
    let second: Vec<_> = engine.providers().iter().map(|p| p.cluster).collect();
    assert_eq!(first, second);
}

#[test]
fn viewing_a_category_lifts_matching_providers() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    let user = UserId("alice".to_string());

    let baseline = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    let baseline_p6 = baseline.iter().find(|p| p.id.0 == "p6").unwrap().score;

    // Heavy interest in cleaning providers in Erode
    for _ in 0..20 {
        engine.record_interaction(
            &user,
            VIEW_PROVIDER_INTERACTION,
            InteractionData {
                provider_id: Some(ProviderId("p6".to_string())),
                category: Some("cleaning".to_string()),
                district: Some("Erode".to_string()),
            },
        );
    }

    let personalized = engine.recommend(None, Some(&user), DEFAULT_RECOMMENDATION_LIMIT);
    let boosted_p6 = personalized.iter().find(|p| p.id.0 == "p6").unwrap().score;
    // 20 views: category weight 2.0 * 0.1 + district weight 2.0 * 0.05 = +0.3
    assert!((boosted_p6 - (baseline_p6 + 0.3)).abs() < 1e-9);

    // An anonymous request is unaffected
    let anonymous = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    let anon_p6 = anonymous.iter().find(|p| p.id.0 == "p6").unwrap().score;
    assert!((anon_p6 - baseline_p6).abs() < 1e-9);
}

#[test]
fn bookings_accumulate_and_surface_popular_choice() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    let id = ProviderId("p4".to_string());

    for expected in 1..=12u64 {
        engine.record_booking(&id, None);
        assert_eq!(engine.booking_count(&id), expected);
    }

    let results = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    let p4 = results.iter().find(|p| p.id == id).unwrap();
    assert!(p4.badges.contains(&"Popular Choice".to_string()));
}

#[test]
fn similar_providers_come_from_the_same_cluster() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);

    let target = ProviderId("p1".to_string());
    let target_cluster = engine
        .providers()
        .iter()
        .find(|p| p.id == target)
        .unwrap()
        .cluster;

    let similar = engine.find_similar(&target, DEFAULT_SIMILAR_LIMIT);
    assert!(similar.len() <= DEFAULT_SIMILAR_LIMIT);
    for p in &similar {
        assert_ne!(p.id, target);
        assert_eq!(p.cluster, target_cluster);
    }
}

#[test]
fn similarity_falls_back_before_clustering() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());

    // No recommend/fit yet, so no cluster labels exist
    let similar = engine.find_similar(&ProviderId("p1".to_string()), DEFAULT_SIMILAR_LIMIT);
    assert!(!similar.is_empty());
    assert!(similar.iter().all(|p| p.id.0 != "p1"));
    // Same category + district scores highest under the heuristic
    assert_eq!(similar[0].id.0, "p3");
}

#[test]
fn unknown_ids_degrade_to_empty_results() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    let ghost = ProviderId("ghost".to_string());

    assert!(engine.find_similar(&ghost, DEFAULT_SIMILAR_LIMIT).is_empty());
    assert!(engine.generate_availability(&ghost, 7).is_empty());
    engine.update_reward(&ghost, DEFAULT_REWARD_DELTA);
}

#[test]
fn availability_updates_slot_count_and_feeds_scoring() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    let id = ProviderId("p2".to_string());

    let slots = engine.generate_availability(&id, 7);
    assert!(!slots.is_empty());

    let p2 = engine.providers().iter().find(|p| p.id == id).unwrap();
    assert_eq!(p2.available_slots as usize, slots.len());

    for pair in slots.windows(2) {
        assert!(
            (pair[0].date, pair[0].time.as_str()) < (pair[1].date, pair[1].time.as_str()),
            "slots out of order or duplicated"
        );
    }
}

#[test]
fn rewards_shift_ranking() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    engine.load_providers(marketplace());
    let id = ProviderId("p6".to_string());

    let before = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    let rank_before = before.iter().position(|p| p.id == id).unwrap();

    for _ in 0..40 {
        engine.update_reward(&id, DEFAULT_REWARD_DELTA);
    }

    let after = engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT);
    let rank_after = after.iter().position(|p| p.id == id).unwrap();
    assert!(rank_after < rank_before, "2.0 of reward should outrank the field");
    assert_eq!(rank_after, 0);
}

#[test]
fn empty_engine_is_harmless_everywhere() {
    init_logging();
    let mut engine = RecommendationEngine::new();
    assert!(engine.recommend(None, None, DEFAULT_RECOMMENDATION_LIMIT).is_empty());
    engine.fit_clusters();
    assert!(engine
        .find_similar(&ProviderId("p1".to_string()), DEFAULT_SIMILAR_LIMIT)
        .is_empty());
}
