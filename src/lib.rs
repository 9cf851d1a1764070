// src/lib.rs
pub mod availability;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod features;
pub mod models;
pub mod personalization;
pub mod scoring;
pub mod similarity;

// Re-export common types for easier access
pub use models::{
    AvailabilitySlot, InteractionData, InteractionRecord, Preferences, Provider, ProviderId,
    UserId, UserProfile,
};

// Re-export important functionality
pub use engine::RecommendationEngine;
pub use personalization::PersonalizationStore;
pub use scoring::BookingLog;
