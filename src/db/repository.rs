//! Persistence ports the recommendation engine reads from and writes to.
//!
//! Each port is an externally owned data source. Implementations read fresh on
//! every call; callers must not cache results across requests.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{EffectMapping, Experiment, ExperimentMappingDismissal, SensoryGaps},
};

/// Source of brew experiments and their sensory values
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// Fetch an experiment owned by `user_id`
    async fn get_by_id(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Option<Experiment>>;

    /// Most recent experiments for a user, newest brew first, capped at `limit`
    async fn list_recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Experiment>>;
}

/// Read path over the effect mapping catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Fetch a mapping owned by `user_id`, active or not
    async fn get_by_id(&self, user_id: Uuid, mapping_id: Uuid) -> AppResult<Option<EffectMapping>>;

    /// Active mappings with at least one actionable effect on an active gap
    ///
    /// Helping and conflicting effects both qualify.
    async fn find_relevant(&self, user_id: Uuid, gaps: &SensoryGaps)
        -> AppResult<Vec<EffectMapping>>;
}

/// Storage for per-experiment dismissals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DismissalRepository: Send + Sync {
    /// Insert, or refresh `dismissed_at` when the key already exists
    async fn upsert(&self, dismissal: &ExperimentMappingDismissal) -> AppResult<()>;

    /// Remove a dismissal, reporting whether one existed
    async fn delete(&self, user_id: Uuid, experiment_id: Uuid, mapping_id: Uuid)
        -> AppResult<bool>;

    /// Dismissed mapping ids for one experiment, oldest dismissal first
    async fn list_by_experiment(&self, user_id: Uuid, experiment_id: Uuid)
        -> AppResult<Vec<Uuid>>;

    /// Dismissed mapping ids for several experiments at once
    ///
    /// Experiments without dismissals are absent from the map.
    async fn list_by_experiments(
        &self,
        user_id: Uuid,
        experiment_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<Uuid>>>;
}
