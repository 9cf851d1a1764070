// src/config.rs

// Number of provider groups produced by the cluster model
pub const DEFAULT_N_CLUSTERS: usize = 4;

// Fixed seed so repeated fits over an unchanged provider set agree
pub const KMEANS_SEED: u64 = 42;
pub const KMEANS_MAX_ITER: usize = 100;

// Categorical strings (category, district) are compressed into this many
// code buckets; collisions are expected and accepted
pub const CATEGORICAL_CODE_BUCKETS: usize = 10;

// Operation defaults exposed to the request layer
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 20;
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;
pub const DEFAULT_DAYS_AHEAD: i64 = 7;
pub const DEFAULT_REWARD_DELTA: f64 = 0.05;

// Interaction kinds understood by the personalization store
pub const VIEW_PROVIDER_INTERACTION: &str = "view_provider";
pub const BOOKING_INTERACTION: &str = "booking";
