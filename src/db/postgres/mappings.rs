use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{decode, PgStore};
use crate::{
    db::repository::MappingRepository,
    error::AppResult,
    models::{Effect, EffectMapping, SensoryGaps},
    services::matcher,
};

const MAPPING_COLUMNS: &str = r#"
    m.id, m.user_id, m.name, m.variable, m.direction, m.tick_description,
    m.source, m.notes, m.active, m.created_at, m.updated_at
"#;

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    variable: String,
    direction: String,
    tick_description: String,
    source: Option<String>,
    notes: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct EffectRow {
    mapping_id: Uuid,
    output_variable: String,
    direction: String,
    range_min: Option<f64>,
    range_max: Option<f64>,
    confidence: String,
}

impl TryFrom<EffectRow> for Effect {
    type Error = crate::error::AppError;

    fn try_from(row: EffectRow) -> Result<Self, Self::Error> {
        Ok(Effect {
            output_variable: decode("output_variable", &row.output_variable)?,
            direction: decode("direction", &row.direction)?,
            range_min: row.range_min,
            range_max: row.range_max,
            confidence: decode("confidence", &row.confidence)?,
        })
    }
}

impl MappingRow {
    fn into_mapping(self, effects: Vec<Effect>) -> AppResult<EffectMapping> {
        Ok(EffectMapping {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            variable: self.variable,
            direction: decode("direction", &self.direction)?,
            tick_description: self.tick_description,
            active: self.active,
            source: self.source,
            notes: self.notes,
            effects,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Joins mapping rows with their ordered effects.
///
/// Any row that fails to decode fails the whole batch.
fn assemble(mappings: Vec<MappingRow>, effects: Vec<EffectRow>) -> AppResult<Vec<EffectMapping>> {
    let mut by_mapping: HashMap<Uuid, Vec<Effect>> = HashMap::new();
    for row in effects {
        let mapping_id = row.mapping_id;
        by_mapping
            .entry(mapping_id)
            .or_default()
            .push(Effect::try_from(row)?);
    }

    mappings
        .into_iter()
        .map(|row| {
            let effects = by_mapping.remove(&row.id).unwrap_or_default();
            row.into_mapping(effects)
        })
        .collect()
}

impl PgStore {
    async fn fetch_effects(&self, mapping_ids: &[Uuid]) -> AppResult<Vec<EffectRow>> {
        let rows = sqlx::query_as(
            r#"
            SELECT mapping_id, output_variable, direction, range_min, range_max, confidence
            FROM mapping_effects
            WHERE mapping_id = ANY($1)
            ORDER BY mapping_id, position
            "#,
        )
        .bind(mapping_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl MappingRepository for PgStore {
    async fn get_by_id(&self, user_id: Uuid, mapping_id: Uuid) -> AppResult<Option<EffectMapping>> {
        let query = format!(
            "SELECT {} FROM effect_mappings m WHERE m.id = $1 AND m.user_id = $2",
            MAPPING_COLUMNS
        );

        let row: Option<MappingRow> = sqlx::query_as(&query)
            .bind(mapping_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let effects = self.fetch_effects(&[row.id]).await?;
        Ok(assemble(vec![row], effects)?.pop())
    }

    async fn find_relevant(
        &self,
        user_id: Uuid,
        gaps: &SensoryGaps,
    ) -> AppResult<Vec<EffectMapping>> {
        let variables: Vec<String> = gaps
            .active()
            .into_iter()
            .map(|(variable, _)| variable.as_str().to_string())
            .collect();

        if variables.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            r#"
            SELECT {} FROM effect_mappings m
            WHERE m.user_id = $1
              AND m.active = TRUE
              AND EXISTS (
                  SELECT 1 FROM mapping_effects e
                  WHERE e.mapping_id = m.id
                    AND e.direction <> 'none'
                    AND e.output_variable = ANY($2)
              )
            ORDER BY m.name
            "#,
            MAPPING_COLUMNS
        );

        let rows: Vec<MappingRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(&variables)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let effects = self.fetch_effects(&ids).await?;
        let mappings = assemble(rows, effects)?;

        tracing::debug!(
            candidates = mappings.len(),
            gap_variables = ?variables,
            "Loaded candidate mappings"
        );

        Ok(matcher::find_relevant(&mappings, gaps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Confidence, EffectDirection, OutputVariable};

    fn mapping_row(id: Uuid, direction: &str) -> MappingRow {
        let now = Utc::now();
        MappingRow {
            id,
            user_id: Uuid::new_v4(),
            name: "Hotter water".to_string(),
            variable: "temperature".to_string(),
            direction: direction.to_string(),
            tick_description: "+1°C".to_string(),
            source: None,
            notes: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn effect_row(mapping_id: Uuid, output: &str, direction: &str, confidence: &str) -> EffectRow {
        EffectRow {
            mapping_id,
            output_variable: output.to_string(),
            direction: direction.to_string(),
            range_min: None,
            range_max: None,
            confidence: confidence.to_string(),
        }
    }

    #[test]
    fn test_assemble_preserves_effect_order() {
        let id = Uuid::new_v4();
        let mappings = assemble(
            vec![mapping_row(id, "increase")],
            vec![
                effect_row(id, "acidity", "increase", "high"),
                effect_row(id, "bitterness", "increase", "low"),
            ],
        )
        .unwrap();

        assert_eq!(mappings.len(), 1);
        let effects = &mappings[0].effects;
        assert_eq!(effects[0].output_variable, OutputVariable::Acidity);
        assert_eq!(effects[1].output_variable, OutputVariable::Bitterness);
        assert_eq!(effects[1].confidence, Confidence::Low);
    }

    #[test]
    fn test_assemble_mapping_without_effects() {
        let id = Uuid::new_v4();
        let mappings = assemble(vec![mapping_row(id, "decrease")], vec![]).unwrap();
        assert!(mappings[0].effects.is_empty());
    }

    #[test]
    fn test_none_direction_decodes() {
        let id = Uuid::new_v4();
        let mappings = assemble(
            vec![mapping_row(id, "increase")],
            vec![effect_row(id, "sweetness", "none", "medium")],
        )
        .unwrap();
        assert_eq!(mappings[0].effects[0].direction, EffectDirection::NoEffect);
    }

    #[test]
    fn test_corrupt_effect_fails_whole_batch() {
        let good = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let result = assemble(
            vec![mapping_row(good, "increase"), mapping_row(bad, "increase")],
            vec![
                effect_row(good, "acidity", "increase", "high"),
                effect_row(bad, "acidity", "increase", "certain"),
            ],
        );
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_corrupt_mapping_direction_fails() {
        let id = Uuid::new_v4();
        let result = assemble(vec![mapping_row(id, "sideways")], vec![]);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
