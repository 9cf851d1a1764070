// src/personalization.rs

use std::collections::HashMap;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::config::VIEW_PROVIDER_INTERACTION;
use crate::models::{InteractionData, InteractionRecord, UserId, UserProfile};

// Weight added to a category/district preference per view event
const VIEW_PREFERENCE_INCREMENT: f64 = 0.1;

/// Per-user profiles built from observed interaction events.
///
/// Profiles are created lazily on first interaction and never destroyed.
/// Preference weights only ever grow; history is never pruned.
#[derive(Debug, Default)]
pub struct PersonalizationStore {
    profiles: HashMap<UserId, UserProfile>,
}

impl PersonalizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The profile accumulated for a user, if any interaction was recorded.
    pub fn profile(&self, user_id: &UserId) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    /// Appends an interaction to the user's history, creating the profile if
    /// absent. View events additionally bump the carried category and
    /// district preference weights and extend the viewed-provider list.
    pub fn record_interaction(&mut self, user_id: &UserId, kind: &str, data: InteractionData) {
        let profile = self
            .profiles
            .entry(user_id.clone())
            .or_insert_with(UserProfile::new);

        profile.interaction_history.push(InteractionRecord {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            data: data.clone(),
            timestamp: Utc::now(),
        });

        if kind != VIEW_PROVIDER_INTERACTION {
            return;
        }

        if let Some(category) = data.category {
            let weight = profile.category_preferences.entry(category).or_insert(0.0);
            *weight += VIEW_PREFERENCE_INCREMENT;
        }
        if let Some(district) = data.district {
            let weight = profile.district_preferences.entry(district).or_insert(0.0);
            *weight += VIEW_PREFERENCE_INCREMENT;
        }
        if let Some(provider_id) = data.provider_id {
            profile.viewed_providers.push(provider_id);
        }

        debug!(
            "Recorded view interaction for user {} ({} history entries)",
            user_id.0,
            profile.interaction_history.len()
        );
    }
}
