// src/models.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//------------------------------------------------------------------------------
// IDENTIFIER TYPES
//------------------------------------------------------------------------------
// Using newtype pattern for type safety to prevent mixing different ID types

/// Strongly typed identifier for Provider records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

/// Strongly typed identifier for users of the recommendation engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

//------------------------------------------------------------------------------
// CORE DOMAIN MODELS
//------------------------------------------------------------------------------

/// A service provider as handed over by the request layer.
///
/// All optional numeric fields fall back to documented defaults at
/// deserialization time rather than failing; the core never rejects a
/// provider record for missing data. The `cluster`, `score` and `badges`
/// fields are derived: the cluster model and scoring engine overwrite them
/// on every recommendation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier for this provider
    pub id: ProviderId,

    /// Average user rating on a 0-5 scale
    #[serde(default = "default_rating")]
    pub rating: f64,

    /// Years of experience
    #[serde(default = "default_experience")]
    pub experience: u32,

    /// Service category (e.g. "plumbing")
    #[serde(default)]
    pub category: String,

    /// District the provider operates in
    #[serde(default)]
    pub district: String,

    /// Whether the provider passed identity verification
    #[serde(default)]
    pub verified: bool,

    /// Typical response time in hours
    #[serde(default = "default_response_time", rename = "responseTime")]
    pub response_time: f64,

    /// Distance from the requesting user
    #[serde(default)]
    pub distance: f64,

    /// Count of currently open availability slots
    #[serde(default, rename = "availableSlots")]
    pub available_slots: u32,

    /// Reinforcement adjustment maintained by an external process,
    /// folded additively into the score
    #[serde(default)]
    pub rl_reward: f64,

    /// Cluster label written by the cluster model; None until a fit ran
    #[serde(default)]
    pub cluster: Option<usize>,

    /// Last computed recommendation score (recomputed per request)
    #[serde(default)]
    pub score: f64,

    /// Badge labels attached by the scoring engine (recomputed per request)
    #[serde(default)]
    pub badges: Vec<String>,
}

fn default_rating() -> f64 {
    3.0
}

fn default_experience() -> u32 {
    1
}

fn default_response_time() -> f64 {
    24.0
}

impl Provider {
    /// Creates a provider with the documented field defaults.
    pub fn new(id: impl Into<String>, category: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            id: ProviderId(id.into()),
            rating: default_rating(),
            experience: default_experience(),
            category: category.into(),
            district: district.into(),
            verified: false,
            response_time: default_response_time(),
            distance: 0.0,
            available_slots: 0,
            rl_reward: 0.0,
            cluster: None,
            score: 0.0,
            badges: Vec::new(),
        }
    }
}

/// Optional user preferences applied while scoring and filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred service category (exact match)
    #[serde(default)]
    pub category: Option<String>,

    /// Preferred district (exact match)
    #[serde(default)]
    pub district: Option<String>,

    /// Maximum acceptable distance; also switches the proximity factor
    /// from its default onto the step function
    #[serde(default)]
    pub distance: Option<f64>,

    /// Minimum provider rating
    #[serde(default, rename = "minRating")]
    pub min_rating: Option<f64>,

    /// Minimum years of experience
    #[serde(default, rename = "minExperience")]
    pub min_experience: Option<u32>,
}

//------------------------------------------------------------------------------
// PERSONALIZATION MODELS
//------------------------------------------------------------------------------

/// Payload attached to a recorded interaction. All fields optional; the
/// store only reacts to the ones that are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub provider_id: Option<ProviderId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

/// One entry in a user's interaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Unique id for this history entry
    pub id: Uuid,
    /// Interaction kind (e.g. "view_provider", "booking")
    pub kind: String,
    pub data: InteractionData,
    pub timestamp: DateTime<Utc>,
}

/// Per-user profile accumulated from interaction events.
///
/// Preference weights grow by a fixed increment per relevant interaction and
/// are never decayed or capped; unbounded growth is an accepted property of
/// this design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Category -> accumulated preference weight
    pub category_preferences: HashMap<String, f64>,
    /// District -> accumulated preference weight
    pub district_preferences: HashMap<String, f64>,
    /// Providers this user has viewed, in order
    pub viewed_providers: Vec<ProviderId>,
    /// Full interaction log, in order
    pub interaction_history: Vec<InteractionRecord>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }
}

//------------------------------------------------------------------------------
// AVAILABILITY MODELS
//------------------------------------------------------------------------------

/// A synthesized bookable time unit for a provider on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    /// Start time formatted "HH:00"
    pub time: String,
    pub available: bool,
}
