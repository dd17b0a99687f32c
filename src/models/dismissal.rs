use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's decision to hide one mapping for one experiment
///
/// Unique on `(experiment_id, mapping_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentMappingDismissal {
    pub experiment_id: Uuid,
    pub mapping_id: Uuid,
    pub user_id: Uuid,
    pub dismissed_at: DateTime<Utc>,
}

impl ExperimentMappingDismissal {
    /// Creates a dismissal stamped with the current time
    pub fn new(experiment_id: Uuid, mapping_id: Uuid, user_id: Uuid) -> Self {
        Self {
            experiment_id,
            mapping_id,
            user_id,
            dismissed_at: Utc::now(),
        }
    }

    pub fn key(&self) -> (Uuid, Uuid, Uuid) {
        (self.experiment_id, self.mapping_id, self.user_id)
    }
}

/// Response body for the dismissed-mappings listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissedMappingsResponse {
    pub experiment_id: Uuid,
    pub mapping_ids: Vec<Uuid>,
}
