use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sensory::SensoryScores;

/// A brew experiment with its measured and targeted sensory profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub brew_date: DateTime<Utc>,
    pub notes: Option<String>,
    /// Values the taster recorded for this brew
    pub measured: SensoryScores,
    /// Values the taster was aiming for
    pub target: SensoryScores,
    pub created_at: DateTime<Utc>,
}

impl Experiment {
    /// Creates an experiment brewed now with no sensory data
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            brew_date: now,
            notes: None,
            measured: SensoryScores::default(),
            target: SensoryScores::default(),
            created_at: now,
        }
    }

    pub fn with_profile(mut self, measured: SensoryScores, target: SensoryScores) -> Self {
        self.measured = measured;
        self.target = target;
        self
    }

    pub fn with_brew_date(mut self, brew_date: DateTime<Utc>) -> Self {
        self.brew_date = brew_date;
        self
    }
}
