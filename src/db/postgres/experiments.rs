use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::PgStore;
use crate::{
    db::repository::ExperimentRepository,
    error::AppResult,
    models::{Experiment, SensoryScores},
};

const EXPERIMENT_COLUMNS: &str = r#"
    id, user_id, brew_date, notes,
    acidity_intensity, sweetness_intensity, bitterness_intensity, body_weight, aroma_intensity,
    target_acidity, target_sweetness, target_bitterness, target_body, target_aroma,
    created_at
"#;

#[derive(sqlx::FromRow)]
struct ExperimentRow {
    id: Uuid,
    user_id: Uuid,
    brew_date: DateTime<Utc>,
    notes: Option<String>,
    acidity_intensity: Option<i32>,
    sweetness_intensity: Option<i32>,
    bitterness_intensity: Option<i32>,
    body_weight: Option<i32>,
    aroma_intensity: Option<i32>,
    target_acidity: Option<i32>,
    target_sweetness: Option<i32>,
    target_bitterness: Option<i32>,
    target_body: Option<i32>,
    target_aroma: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<ExperimentRow> for Experiment {
    fn from(row: ExperimentRow) -> Self {
        Experiment {
            id: row.id,
            user_id: row.user_id,
            brew_date: row.brew_date,
            notes: row.notes,
            measured: SensoryScores {
                acidity: row.acidity_intensity,
                sweetness: row.sweetness_intensity,
                bitterness: row.bitterness_intensity,
                body: row.body_weight,
                aroma: row.aroma_intensity,
            },
            target: SensoryScores {
                acidity: row.target_acidity,
                sweetness: row.target_sweetness,
                bitterness: row.target_bitterness,
                body: row.target_body,
                aroma: row.target_aroma,
            },
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ExperimentRepository for PgStore {
    async fn get_by_id(&self, user_id: Uuid, experiment_id: Uuid) -> AppResult<Option<Experiment>> {
        let query = format!(
            "SELECT {} FROM experiments WHERE id = $1 AND user_id = $2",
            EXPERIMENT_COLUMNS
        );

        let row: Option<ExperimentRow> = sqlx::query_as(&query)
            .bind(experiment_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Experiment::from))
    }

    async fn list_recent(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Experiment>> {
        let query = format!(
            "SELECT {} FROM experiments WHERE user_id = $1 \
             ORDER BY brew_date DESC, created_at DESC, id LIMIT $2",
            EXPERIMENT_COLUMNS
        );

        let rows: Vec<ExperimentRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Experiment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_measured_and_target_columns() {
        let now = Utc::now();
        let row = ExperimentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            brew_date: now,
            notes: Some("V60, 15g".to_string()),
            acidity_intensity: Some(3),
            sweetness_intensity: None,
            bitterness_intensity: Some(6),
            body_weight: Some(4),
            aroma_intensity: None,
            target_acidity: Some(6),
            target_sweetness: Some(7),
            target_bitterness: Some(3),
            target_body: None,
            target_aroma: None,
            created_at: now,
        };

        let experiment = Experiment::from(row);
        assert_eq!(experiment.measured.acidity, Some(3));
        assert_eq!(experiment.measured.body, Some(4));
        assert_eq!(experiment.target.sweetness, Some(7));
        assert_eq!(experiment.target.body, None);
    }
}
