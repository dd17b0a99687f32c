use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{DismissalRepository, ExperimentRepository, MappingRepository};
use crate::{
    error::AppResult,
    models::{EffectMapping, Experiment, ExperimentMappingDismissal, SensoryGaps},
    services::matcher,
};

/// In-process store backing all three repositories
///
/// Used by tests and local runs without Postgres. Writes take the lock for the
/// whole operation, so an upsert is atomic with respect to other callers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    experiments: HashMap<Uuid, Experiment>,
    mappings: HashMap<Uuid, EffectMapping>,
    dismissals: HashMap<(Uuid, Uuid, Uuid), ExperimentMappingDismissal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_experiment(&self, experiment: Experiment) {
        let mut inner = self.inner.write().await;
        inner.experiments.insert(experiment.id, experiment);
    }

    pub async fn insert_mapping(&self, mapping: EffectMapping) {
        let mut inner = self.inner.write().await;
        inner.mappings.insert(mapping.id, mapping);
    }

    /// Stored dismissal rows for one experiment, for inspection
    pub async fn dismissal_rows(&self, experiment_id: Uuid) -> Vec<ExperimentMappingDismissal> {
        let inner = self.inner.read().await;
        inner
            .dismissals
            .values()
            .filter(|d| d.experiment_id == experiment_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExperimentRepository for MemoryStore {
    async fn get_by_id(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Option<Experiment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .experiments
            .get(&experiment_id)
            .filter(|e| e.user_id == user_id)
            .cloned())
    }

    async fn list_recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Experiment>> {
        let inner = self.inner.read().await;
        let mut experiments: Vec<Experiment> = inner
            .experiments
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();

        experiments.sort_by(|a, b| {
            b.brew_date
                .cmp(&a.brew_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        experiments.truncate(limit);

        Ok(experiments)
    }
}

#[async_trait]
impl MappingRepository for MemoryStore {
    async fn get_by_id(&self, user_id: Uuid, mapping_id: Uuid) -> AppResult<Option<EffectMapping>> {
        let inner = self.inner.read().await;
        Ok(inner
            .mappings
            .get(&mapping_id)
            .filter(|m| m.user_id == user_id)
            .cloned())
    }

    async fn find_relevant(
        &self,
        user_id: Uuid,
        gaps: &SensoryGaps,
    ) -> AppResult<Vec<EffectMapping>> {
        let inner = self.inner.read().await;
        let owned = inner.mappings.values().filter(|m| m.user_id == user_id);
        Ok(matcher::find_relevant(owned, gaps))
    }
}

#[async_trait]
impl DismissalRepository for MemoryStore {
    async fn upsert(&self, dismissal: &ExperimentMappingDismissal) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.dismissals.insert(dismissal.key(), dismissal.clone());
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, experiment_id: Uuid, mapping_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .dismissals
            .remove(&(experiment_id, mapping_id, user_id))
            .is_some())
    }

    async fn list_by_experiment(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Vec<Uuid>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<&ExperimentMappingDismissal> = inner
            .dismissals
            .values()
            .filter(|d| d.user_id == user_id && d.experiment_id == experiment_id)
            .collect();

        rows.sort_by(|a, b| {
            a.dismissed_at
                .cmp(&b.dismissed_at)
                .then_with(|| a.mapping_id.cmp(&b.mapping_id))
        });

        Ok(rows.into_iter().map(|d| d.mapping_id).collect())
    }

    async fn list_by_experiments(
        &self,
        user_id: Uuid,
        experiment_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<Uuid>>> {
        let inner = self.inner.read().await;
        let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();

        for dismissal in inner.dismissals.values() {
            if dismissal.user_id == user_id && experiment_ids.contains(&dismissal.experiment_id) {
                grouped
                    .entry(dismissal.experiment_id)
                    .or_default()
                    .push(dismissal.mapping_id);
            }
        }

        Ok(grouped)
    }
}
