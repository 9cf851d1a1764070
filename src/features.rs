// src/features.rs

use std::collections::HashMap;

use crate::config::CATEGORICAL_CODE_BUCKETS;
use crate::models::Provider;

/// Dimensionality of the provider feature vector:
/// [rating, experience, category_code, district_code, verified, response_time]
pub const FEATURE_DIM: usize = 6;

/// Turns provider records into fixed-length numeric vectors for clustering.
///
/// Category and district strings are encoded through an explicit first-seen
/// dictionary reduced modulo a small bucket count, so any given string maps
/// to the same code for the lifetime of the extractor. Collisions between
/// distinct strings are a deliberate compression, not a defect.
#[derive(Debug, Default)]
pub struct FeatureExtractor {
    category_codes: HashMap<String, usize>,
    district_codes: HashMap<String, usize>,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the 6-dimensional feature vector for one provider.
    pub fn extract(&mut self, provider: &Provider) -> [f64; FEATURE_DIM] {
        let category_code = assign_code(&mut self.category_codes, &provider.category);
        let district_code = assign_code(&mut self.district_codes, &provider.district);

        [
            provider.rating,
            provider.experience as f64,
            category_code as f64,
            district_code as f64,
            if provider.verified { 1.0 } else { 0.0 },
            provider.response_time,
        ]
    }

    /// Extracts feature vectors for a whole provider set, in order.
    pub fn extract_all(&mut self, providers: &[Provider]) -> Vec<[f64; FEATURE_DIM]> {
        providers.iter().map(|p| self.extract(p)).collect()
    }
}

// First-seen index reduced into the bucket range. The raw index is kept in
// the dictionary so insertion order, not bucket value, stays the identity.
fn assign_code(codes: &mut HashMap<String, usize>, key: &str) -> usize {
    let next = codes.len();
    let raw = *codes.entry(key.to_string()).or_insert(next);
    raw % CATEGORICAL_CODE_BUCKETS
}
