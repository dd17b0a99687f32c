use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    config::EngineSettings,
    db::{DismissalRepository, ExperimentRepository, MappingRepository},
    error::{AppError, AppResult},
    models::{
        Experiment, ExperimentWithGaps, ExperimentsWithGapsResponse, Pagination,
        RecommendationsResponse, SensoryGaps,
    },
    services::{gaps, scorer},
};

/// Produces ranked recommendations and the gap backlog
///
/// Holds no state between calls: the experiment, the catalog and the
/// dismissals are fetched fresh for every request.
#[derive(Clone)]
pub struct RecommendationEngine {
    experiments: Arc<dyn ExperimentRepository>,
    mappings: Arc<dyn MappingRepository>,
    dismissals: Arc<dyn DismissalRepository>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        experiments: Arc<dyn ExperimentRepository>,
        mappings: Arc<dyn MappingRepository>,
        dismissals: Arc<dyn DismissalRepository>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            experiments,
            mappings,
            dismissals,
            settings,
        }
    }

    async fn load_experiment(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Experiment> {
        self.experiments
            .get_by_id(user_id, experiment_id)
            .await?
            .ok_or_else(|| AppError::experiment_not_found(experiment_id))
    }

    pub fn compute_gaps(&self, experiment: &Experiment) -> SensoryGaps {
        gaps::compute_gaps(experiment, self.settings.gap_tolerance)
    }

    /// Ranked recommendations for one experiment
    ///
    /// An experiment with no active gaps yields an empty response without
    /// consulting the catalog.
    pub async fn get_recommendations(
        &self,
        user_id: Uuid,
        experiment_id: Uuid,
    ) -> AppResult<RecommendationsResponse> {
        let start = Instant::now();
        let experiment = self.load_experiment(user_id, experiment_id).await?;
        let gaps = self.compute_gaps(&experiment);
        let gap_count = gaps::count_active_gaps(&gaps);

        if gap_count == 0 {
            tracing::debug!(%experiment_id, "Experiment has no active gaps");
            return Ok(RecommendationsResponse::empty(experiment_id));
        }

        let relevant = self.mappings.find_relevant(user_id, &gaps).await?;
        let dismissed: HashSet<Uuid> = self
            .dismissals
            .list_by_experiment(user_id, experiment_id)
            .await?
            .into_iter()
            .collect();

        let recommendations = scorer::rank(relevant, &gaps, &dismissed);

        tracing::info!(
            %experiment_id,
            gap_count,
            recommendation_count = recommendations.len(),
            dismissed_count = dismissed.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Recommendations computed"
        );

        Ok(RecommendationsResponse {
            total_count: recommendations.len(),
            recommendations,
            experiment_id,
        })
    }

    /// Experiments with at least one active gap, newest first, paginated
    ///
    /// Scans at most `backlog_scan_limit` recent experiments, filters them to
    /// gap-bearing ones, and only then paginates, so `total_count` covers
    /// the whole filtered scan.
    pub async fn list_experiments_with_gaps(
        &self,
        user_id: Uuid,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> AppResult<ExperimentsWithGapsResponse> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(self.settings.default_page_size)
            .clamp(1, self.settings.max_page_size);

        let scanned = self
            .experiments
            .list_recent(user_id, self.settings.backlog_scan_limit)
            .await?;
        let scanned_count = scanned.len();

        let with_gaps: Vec<(Experiment, SensoryGaps, usize)> = scanned
            .into_iter()
            .filter_map(|experiment| {
                let gaps = self.compute_gaps(&experiment);
                let count = gaps::count_active_gaps(&gaps);
                (count > 0).then_some((experiment, gaps, count))
            })
            .collect();

        let pagination = Pagination::new(page, page_size, with_gaps.len());
        let page_items = &with_gaps[pagination.bounds()];

        let page_ids: Vec<Uuid> = page_items.iter().map(|(e, _, _)| e.id).collect();
        let dismissed = self
            .dismissals
            .list_by_experiments(user_id, &page_ids)
            .await?;

        let mut experiments = Vec::with_capacity(page_items.len());
        for (experiment, gaps, gap_count) in page_items {
            let relevant = self.mappings.find_relevant(user_id, gaps).await?;
            experiments.push(ExperimentWithGaps {
                experiment_id: experiment.id,
                brew_date: experiment.brew_date,
                notes: experiment.notes.clone(),
                gaps: *gaps,
                gap_count: *gap_count,
                recommendation_count: relevant.len(),
                dismissed_count: dismissed.get(&experiment.id).map_or(0, Vec::len),
            });
        }

        tracing::info!(
            %user_id,
            scanned = scanned_count,
            with_gaps = pagination.total_count,
            page,
            page_size,
            "Gap backlog listed"
        );

        Ok(ExperimentsWithGapsResponse {
            experiments,
            pagination,
        })
    }
}
