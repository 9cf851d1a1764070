// src/engine.rs

use anyhow::{ensure, Result};
use log::{debug, info};

use crate::availability;
use crate::cluster::ClusterModel;
use crate::config::{BOOKING_INTERACTION, DEFAULT_N_CLUSTERS, VIEW_PROVIDER_INTERACTION};
use crate::features::FeatureExtractor;
use crate::models::{AvailabilitySlot, InteractionData, Preferences, Provider, ProviderId, UserId};
use crate::personalization::PersonalizationStore;
use crate::scoring::{self, BookingLog};
use crate::similarity;

/// Top-level recommendation engine owning all mutable state: the provider
/// collection, the feature extractor and cluster model, the per-user
/// personalization store and the booking log.
///
/// All methods are synchronous and take `&mut self`; callers sharing an
/// engine across threads wrap it in their own lock. Scores, badges and
/// cluster labels are written onto the providers in place and recomputed on
/// every recommendation pass, never cached across calls.
pub struct RecommendationEngine {
    providers: Vec<Provider>,
    extractor: FeatureExtractor,
    cluster_model: ClusterModel,
    personalization: PersonalizationStore,
    bookings: BookingLog,
    clusters_dirty: bool,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            extractor: FeatureExtractor::new(),
            cluster_model: ClusterModel::new(DEFAULT_N_CLUSTERS),
            personalization: PersonalizationStore::new(),
            bookings: BookingLog::new(),
            clusters_dirty: true,
        }
    }

    /// Engine with a non-default cluster count.
    pub fn with_cluster_count(n_clusters: usize) -> Result<Self> {
        ensure!(n_clusters > 0, "cluster count must be at least 1");
        let mut engine = Self::new();
        engine.cluster_model = ClusterModel::new(n_clusters);
        Ok(engine)
    }

    /// Replaces the provider collection. Prior cluster assignments are
    /// invalidated; the next recommendation pass refits the model.
    pub fn load_providers(&mut self, providers: Vec<Provider>) {
        info!("Loaded {} providers", providers.len());
        self.providers = providers;
        self.clusters_dirty = true;
    }

    /// Read-only view of the provider collection, including derived fields
    /// from the most recent pass.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Recomputes cluster assignments over the current provider set.
    pub fn fit_clusters(&mut self) {
        self.cluster_model.fit(&mut self.providers, &mut self.extractor);
        self.clusters_dirty = false;
    }

    /// Scores, badges, filters, sorts and truncates the provider set.
    ///
    /// Refits the cluster model first when the collection changed since the
    /// last fit. Filters apply sequentially and each is optional: exact
    /// category, exact district, minimum rating, minimum experience, and a
    /// maximum-distance bound that only engages when a district preference
    /// accompanies it.
    pub fn recommend(
        &mut self,
        preferences: Option<&Preferences>,
        user_id: Option<&UserId>,
        limit: usize,
    ) -> Vec<Provider> {
        if self.providers.is_empty() {
            debug!("Recommendation over empty provider set");
            return Vec::new();
        }

        if self.clusters_dirty || !self.cluster_model.is_fitted() {
            self.cluster_model.fit(&mut self.providers, &mut self.extractor);
            self.clusters_dirty = false;
        }

        let profile = user_id.and_then(|u| self.personalization.profile(u));
        for provider in self.providers.iter_mut() {
            provider.score = scoring::calculate_score(provider, preferences, profile);
            scoring::assign_badges(provider, self.bookings.count(&provider.id));
        }

        let mut results: Vec<Provider> = self
            .providers
            .iter()
            .filter(|p| passes_filters(p, preferences))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        results
    }

    /// Providers similar to the given one; empty when the id is unknown.
    pub fn find_similar(&self, provider_id: &ProviderId, limit: usize) -> Vec<Provider> {
        similarity::find_similar(&self.providers, provider_id, limit)
    }

    /// Records a user interaction event for personalization.
    pub fn record_interaction(&mut self, user_id: &UserId, kind: &str, data: InteractionData) {
        self.personalization.record_interaction(user_id, kind, data);
    }

    /// Increments the provider's booking count. When a user id is present,
    /// also synthesizes a booking event plus an implicit view event carrying
    /// the provider's category and district, so bookings weigh more in
    /// personalization than plain views.
    pub fn record_booking(&mut self, provider_id: &ProviderId, user_id: Option<&UserId>) {
        let count = self.bookings.record(provider_id);
        debug!("Booking {} recorded for provider {}", count, provider_id.0);

        let Some(user_id) = user_id else {
            return;
        };

        self.personalization.record_interaction(
            user_id,
            BOOKING_INTERACTION,
            InteractionData {
                provider_id: Some(provider_id.clone()),
                ..Default::default()
            },
        );

        if let Some(provider) = self.providers.iter().find(|p| &p.id == provider_id) {
            let data = InteractionData {
                provider_id: Some(provider_id.clone()),
                category: Some(provider.category.clone()),
                district: Some(provider.district.clone()),
            };
            self.personalization
                .record_interaction(user_id, VIEW_PROVIDER_INTERACTION, data);
        }
    }

    /// Booking count recorded so far for a provider.
    pub fn booking_count(&self, provider_id: &ProviderId) -> u64 {
        self.bookings.count(provider_id)
    }

    /// Generates availability slots for a provider and updates its slot
    /// count. Empty when the id is unknown.
    pub fn generate_availability(
        &mut self,
        provider_id: &ProviderId,
        days_ahead: i64,
    ) -> Vec<AvailabilitySlot> {
        match self.providers.iter_mut().find(|p| &p.id == provider_id) {
            Some(provider) => availability::generate_for_provider(provider, days_ahead),
            None => {
                debug!("Availability request for unknown provider {}", provider_id.0);
                Vec::new()
            }
        }
    }

    /// Adds a delta to the provider's reinforcement reward term. Unknown
    /// ids are a silent no-op.
    pub fn update_reward(&mut self, provider_id: &ProviderId, delta: f64) {
        match self.providers.iter_mut().find(|p| &p.id == provider_id) {
            Some(provider) => {
                provider.rl_reward += delta;
                debug!(
                    "Reward for provider {} now {:.3}",
                    provider_id.0, provider.rl_reward
                );
            }
            None => debug!("Reward update for unknown provider {}", provider_id.0),
        }
    }
}

fn passes_filters(provider: &Provider, preferences: Option<&Preferences>) -> bool {
    let Some(prefs) = preferences else {
        return true;
    };

    if let Some(category) = &prefs.category {
        if &provider.category != category {
            return false;
        }
    }
    if let Some(district) = &prefs.district {
        if &provider.district != district {
            return false;
        }
    }
    if let Some(min_rating) = prefs.min_rating {
        if provider.rating < min_rating {
            return false;
        }
    }
    if let Some(min_experience) = prefs.min_experience {
        if provider.experience < min_experience {
            return false;
        }
    }
    // Distance bound only applies alongside a district preference
    if let (Some(max_distance), Some(_)) = (prefs.distance, &prefs.district) {
        if provider.distance > max_distance {
            return false;
        }
    }

    true
}
