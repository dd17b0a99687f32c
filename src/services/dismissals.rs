use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DismissalRepository, ExperimentRepository, MappingRepository},
    error::{AppError, AppResult},
    models::ExperimentMappingDismissal,
};

/// Per-experiment record of mappings a user chose to hide
#[derive(Clone)]
pub struct DismissalLedger {
    experiments: Arc<dyn ExperimentRepository>,
    mappings: Arc<dyn MappingRepository>,
    dismissals: Arc<dyn DismissalRepository>,
}

impl DismissalLedger {
    pub fn new(
        experiments: Arc<dyn ExperimentRepository>,
        mappings: Arc<dyn MappingRepository>,
        dismissals: Arc<dyn DismissalRepository>,
    ) -> Self {
        Self {
            experiments,
            mappings,
            dismissals,
        }
    }

    async fn ensure_experiment(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<()> {
        match self.experiments.get_by_id(user_id, experiment_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::experiment_not_found(experiment_id)),
        }
    }

    /// Hides a mapping for one experiment.
    ///
    /// Idempotent: dismissing again refreshes `dismissed_at` on the existing entry.
    pub async fn dismiss(&self, user_id: Uuid, experiment_id: Uuid, mapping_id: Uuid) -> AppResult<()> {
        self.ensure_experiment(user_id, experiment_id).await?;

        if self.mappings.get_by_id(user_id, mapping_id).await?.is_none() {
            return Err(AppError::mapping_not_found(mapping_id));
        }

        let dismissal = ExperimentMappingDismissal::new(experiment_id, mapping_id, user_id);
        self.dismissals.upsert(&dismissal).await?;

        tracing::info!(%experiment_id, %mapping_id, "Mapping dismissed");
        Ok(())
    }

    /// Restores a dismissed mapping; fails when there is nothing to undo
    pub async fn undo_dismiss(
        &self,
        user_id: Uuid,
        experiment_id: Uuid,
        mapping_id: Uuid,
    ) -> AppResult<()> {
        let removed = self
            .dismissals
            .delete(user_id, experiment_id, mapping_id)
            .await?;

        if !removed {
            return Err(AppError::NotFound(format!(
                "dismissal of mapping {} for experiment {}",
                mapping_id, experiment_id
            )));
        }

        tracing::info!(%experiment_id, %mapping_id, "Mapping dismissal undone");
        Ok(())
    }

    /// Dismissed mapping ids for an experiment; empty when none
    pub async fn list_dismissed(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.ensure_experiment(user_id, experiment_id).await?;
        self.dismissals.list_by_experiment(user_id, experiment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{
        MockDismissalRepository, MockExperimentRepository, MockMappingRepository,
    };
    use crate::db::MemoryStore;
    use crate::models::{ChangeDirection, EffectMapping, Experiment};
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        store: MemoryStore,
        ledger: DismissalLedger,
        user_id: Uuid,
        experiment_id: Uuid,
        mapping_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let experiment = Experiment::new(user_id);
        let experiment_id = experiment.id;
        store.insert_experiment(experiment).await;

        let mapping = EffectMapping::new(user_id, "Coarser grind", "grind_size", ChangeDirection::Increase);
        let mapping_id = mapping.id;
        store.insert_mapping(mapping).await;

        let ledger = DismissalLedger::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        Fixture {
            store,
            ledger,
            user_id,
            experiment_id,
            mapping_id,
        }
    }

    #[tokio::test]
    async fn test_redismiss_refreshes_single_entry() {
        let f = fixture().await;

        assert_ok!(f.ledger.dismiss(f.user_id, f.experiment_id, f.mapping_id).await);
        let first = f.store.dismissal_rows(f.experiment_id).await[0].dismissed_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_ok!(f.ledger.dismiss(f.user_id, f.experiment_id, f.mapping_id).await);

        let rows = f.store.dismissal_rows(f.experiment_id).await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].dismissed_at > first);
    }

    #[tokio::test]
    async fn test_undo_removes_from_listing() {
        let f = fixture().await;

        f.ledger.dismiss(f.user_id, f.experiment_id, f.mapping_id).await.unwrap();
        assert_eq!(
            f.ledger.list_dismissed(f.user_id, f.experiment_id).await.unwrap(),
            vec![f.mapping_id]
        );

        assert_ok!(f.ledger.undo_dismiss(f.user_id, f.experiment_id, f.mapping_id).await);
        assert!(f
            .ledger
            .list_dismissed(f.user_id, f.experiment_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_undo_without_dismissal_is_not_found() {
        let f = fixture().await;
        let err = assert_err!(f.ledger.undo_dismiss(f.user_id, f.experiment_id, f.mapping_id).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dismiss_unknown_mapping_is_not_found() {
        let f = fixture().await;
        let err = assert_err!(f.ledger.dismiss(f.user_id, f.experiment_id, Uuid::new_v4()).await);
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(f.store.dismissal_rows(f.experiment_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_for_other_user_is_not_found() {
        let f = fixture().await;
        let err = assert_err!(f.ledger.dismiss(Uuid::new_v4(), f.experiment_id, f.mapping_id).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dismissal_scoped_per_experiment() {
        let f = fixture().await;
        let other = Experiment::new(f.user_id);
        let other_id = other.id;
        f.store.insert_experiment(other).await;

        f.ledger.dismiss(f.user_id, f.experiment_id, f.mapping_id).await.unwrap();

        assert!(f.ledger.list_dismissed(f.user_id, other_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_error() {
        let user_id = Uuid::new_v4();
        let experiment = Experiment::new(user_id);
        let experiment_id = experiment.id;
        let mapping = EffectMapping::new(user_id, "Hotter", "temperature", ChangeDirection::Increase);
        let mapping_id = mapping.id;

        let mut experiments = MockExperimentRepository::new();
        experiments
            .expect_get_by_id()
            .returning(move |_, _| Ok(Some(experiment.clone())));

        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get_by_id()
            .returning(move |_, _| Ok(Some(mapping.clone())));

        let mut dismissals = MockDismissalRepository::new();
        dismissals
            .expect_upsert()
            .times(1)
            .returning(|_| Err(AppError::Internal("storage unavailable".to_string())));

        let ledger = DismissalLedger::new(Arc::new(experiments), Arc::new(mappings), Arc::new(dismissals));

        let err = assert_err!(ledger.dismiss(user_id, experiment_id, mapping_id).await);
        assert!(matches!(err, AppError::Internal(_)));
    }
}
