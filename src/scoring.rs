// src/scoring.rs

use std::collections::HashMap;

use log::debug;

use crate::models::{Preferences, Provider, ProviderId, UserProfile};

// Weights for the base score factors
const RATING_WEIGHT: f64 = 0.4;
const VERIFIED_WEIGHT: f64 = 0.3;
const CATEGORY_MATCH_WEIGHT: f64 = 0.2;
const PROXIMITY_WEIGHT: f64 = 0.1;

// Neutral factor values when no preference is supplied
const DEFAULT_CATEGORY_MATCH: f64 = 0.5;
const DEFAULT_PROXIMITY: f64 = 0.8;

// Personalization boost weights
const CATEGORY_BOOST_WEIGHT: f64 = 0.1;
const DISTRICT_BOOST_WEIGHT: f64 = 0.05;

// Availability contribution: slots / 10, capped
const AVAILABILITY_BOOST_CAP: f64 = 0.2;

// Badge thresholds
const HIGHLY_RECOMMENDED_MIN_SCORE: f64 = 4.5;
const FAST_RESPONSE_MAX_HOURS: f64 = 5.0;
const NEW_PROVIDER_MAX_RATING: f64 = 3.5;
const NEW_PROVIDER_MAX_EXPERIENCE: u32 = 1;
const TRUSTED_ADVISOR_MIN_EXPERIENCE: u32 = 10;
const HIGH_AVAILABILITY_MIN_SLOTS: u32 = 5;
const POPULAR_CHOICE_MIN_BOOKINGS: u64 = 10;

pub const BADGE_HIGHLY_RECOMMENDED: &str = "Highly Recommended";
pub const BADGE_FAST_TRUSTED: &str = "Fast & Trusted";
pub const BADGE_NEW_PROVIDER: &str = "New Provider";
pub const BADGE_TRUSTED_ADVISOR: &str = "Trusted Advisor";
pub const BADGE_HIGH_AVAILABILITY: &str = "High Availability";
pub const BADGE_POPULAR_CHOICE: &str = "Popular Choice";

/// Process-wide booking counts per provider, increment-only.
#[derive(Debug, Default)]
pub struct BookingLog {
    counts: HashMap<ProviderId, u64>,
}

impl BookingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one booking and returns the new count.
    pub fn record(&mut self, provider_id: &ProviderId) -> u64 {
        let count = self.counts.entry(provider_id.clone()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, provider_id: &ProviderId) -> u64 {
        self.counts.get(provider_id).copied().unwrap_or(0)
    }
}

/// Computes the multi-factor recommendation score, rounded to one decimal.
///
/// Factors: weighted rating, verification, category match against the
/// preferred category, a distance step function, personalization boosts from
/// the user's accumulated category/district weights, the externally
/// maintained reinforcement reward (added verbatim), and a capped
/// availability boost.
pub fn calculate_score(
    provider: &Provider,
    preferences: Option<&Preferences>,
    profile: Option<&UserProfile>,
) -> f64 {
    let mut score = provider.rating * RATING_WEIGHT;

    if provider.verified {
        score += VERIFIED_WEIGHT;
    }

    score += category_match_factor(provider, preferences) * CATEGORY_MATCH_WEIGHT;
    score += proximity_factor(provider, preferences) * PROXIMITY_WEIGHT;

    if let Some(profile) = profile {
        if let Some(weight) = profile.category_preferences.get(&provider.category) {
            debug!(
                "Applying category boost {:.2} for provider {}",
                weight, provider.id.0
            );
            score += weight * CATEGORY_BOOST_WEIGHT;
        }
        if let Some(weight) = profile.district_preferences.get(&provider.district) {
            score += weight * DISTRICT_BOOST_WEIGHT;
        }
    }

    score += provider.rl_reward;

    if provider.available_slots > 0 {
        score += (provider.available_slots as f64 / 10.0).min(AVAILABILITY_BOOST_CAP);
    }

    (score * 10.0).round() / 10.0
}

fn category_match_factor(provider: &Provider, preferences: Option<&Preferences>) -> f64 {
    match preferences.and_then(|p| p.category.as_deref()) {
        Some(preferred) if provider.category == preferred => 1.0,
        _ => DEFAULT_CATEGORY_MATCH,
    }
}

// The step function only engages when the caller bounded the distance;
// without a bound every provider gets the neutral default.
fn proximity_factor(provider: &Provider, preferences: Option<&Preferences>) -> f64 {
    if preferences.and_then(|p| p.distance).is_none() {
        return DEFAULT_PROXIMITY;
    }
    match provider.distance {
        d if d <= 10.0 => 1.0,
        d if d <= 20.0 => 0.8,
        d if d <= 40.0 => 0.5,
        d if d <= 60.0 => 0.2,
        _ => 0.0,
    }
}

/// Rewrites the provider's badge set from the threshold rules. Must run
/// after scoring: the "Highly Recommended" rule reads the computed score,
/// which already includes personalization and reinforcement terms.
pub fn assign_badges(provider: &mut Provider, booking_count: u64) {
    let mut badges = Vec::new();

    if provider.score > HIGHLY_RECOMMENDED_MIN_SCORE {
        badges.push(BADGE_HIGHLY_RECOMMENDED.to_string());
    }
    if provider.response_time < FAST_RESPONSE_MAX_HOURS {
        badges.push(BADGE_FAST_TRUSTED.to_string());
    }
    if provider.rating < NEW_PROVIDER_MAX_RATING || provider.experience < NEW_PROVIDER_MAX_EXPERIENCE
    {
        badges.push(BADGE_NEW_PROVIDER.to_string());
    }
    if provider.verified && provider.experience > TRUSTED_ADVISOR_MIN_EXPERIENCE {
        badges.push(BADGE_TRUSTED_ADVISOR.to_string());
    }
    if provider.available_slots > HIGH_AVAILABILITY_MIN_SLOTS {
        badges.push(BADGE_HIGH_AVAILABILITY.to_string());
    }
    if booking_count > POPULAR_CHOICE_MIN_BOOKINGS {
        badges.push(BADGE_POPULAR_CHOICE.to_string());
    }

    provider.badges = badges;
}
