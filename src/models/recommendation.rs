use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mapping::EffectMapping;
use super::sensory::SensoryGaps;

/// A scored mapping for one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub mapping: EffectMapping,
    pub helps_count: usize,
    /// Labels of the helped gaps, in canonical gap order
    pub helps_gaps: Vec<String>,
    pub has_conflict: bool,
    pub score: i32,
    pub is_dismissed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub experiment_id: Uuid,
    pub total_count: usize,
}

impl RecommendationsResponse {
    pub fn empty(experiment_id: Uuid) -> Self {
        Self {
            recommendations: Vec::new(),
            experiment_id,
            total_count: 0,
        }
    }
}

/// Page metadata for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_count: usize) -> Self {
        let size = page_size.max(1) as usize;
        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(size),
        }
    }

    /// Index range of this page within the filtered result set
    pub fn bounds(&self) -> std::ops::Range<usize> {
        let size = self.page_size.max(1) as usize;
        let start = (self.page.max(1) as usize - 1)
            .saturating_mul(size)
            .min(self.total_count);
        let end = start.saturating_add(size).min(self.total_count);
        start..end
    }
}

/// A backlog entry: an experiment with at least one active gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentWithGaps {
    pub experiment_id: Uuid,
    pub brew_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub gaps: SensoryGaps,
    pub gap_count: usize,
    pub recommendation_count: usize,
    pub dismissed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentsWithGapsResponse {
    pub experiments: Vec<ExperimentWithGaps>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_last_partial_page() {
        let pagination = Pagination::new(3, 10, 23);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.bounds(), 20..23);
    }

    #[test]
    fn test_pagination_out_of_range_page_is_empty() {
        let pagination = Pagination::new(9, 10, 23);
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.bounds().is_empty());
    }

    #[test]
    fn test_pagination_empty_result_set() {
        let pagination = Pagination::new(1, 20, 0);
        assert_eq!(pagination.total_pages, 0);
        assert!(pagination.bounds().is_empty());
    }

    #[test]
    fn test_recommendation_flattens_mapping_fields() {
        use crate::models::{ChangeDirection, EffectMapping};

        let mapping = EffectMapping::new(Uuid::new_v4(), "Finer grind", "grind_size", ChangeDirection::Decrease);
        let recommendation = Recommendation {
            mapping,
            helps_count: 1,
            helps_gaps: vec!["Body".to_string()],
            has_conflict: false,
            score: 12,
            is_dismissed: false,
        };

        let json = serde_json::to_value(&recommendation).unwrap();
        assert_eq!(json["name"], "Finer grind");
        assert_eq!(json["direction"], "decrease");
        assert_eq!(json["score"], 12);
        assert!(json.get("mapping").is_none());
    }
}
