use std::cmp::Ordering;
use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{EffectMapping, Recommendation, SensoryGaps, SensoryVariable};

/// Points per helped gap; dominates any confidence total.
pub const HELP_POINTS: i32 = 10;
/// Flat penalty when any effect widens an active gap.
pub const CONFLICT_PENALTY: i32 = 5;

/// How one mapping lines up against an experiment's gaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingAssessment {
    /// Helped attributes in canonical order, without duplicates
    pub helps: Vec<SensoryVariable>,
    pub confidence_weight: i32,
    pub has_conflict: bool,
}

impl MappingAssessment {
    pub fn score(&self) -> i32 {
        let penalty = if self.has_conflict { CONFLICT_PENALTY } else { 0 };
        self.helps.len() as i32 * HELP_POINTS + self.confidence_weight - penalty
    }
}

/// Walks a mapping's effects against the active gaps.
///
/// Every helping effect adds its confidence weight. A single conflicting
/// effect taints the whole mapping. Effects on attributes without an active
/// gap, and `none` effects, are skipped.
pub fn assess(mapping: &EffectMapping, gaps: &SensoryGaps) -> MappingAssessment {
    let mut helped: HashSet<SensoryVariable> = HashSet::new();
    let mut assessment = MappingAssessment::default();

    for effect in &mapping.effects {
        let Some(variable) = effect.actionable_variable() else {
            continue;
        };
        let Some(desired) = gaps.desired(variable) else {
            continue;
        };

        match effect.direction.closes(desired) {
            Some(true) => {
                helped.insert(variable);
                assessment.confidence_weight += effect.confidence.weight();
            }
            Some(false) => assessment.has_conflict = true,
            None => {}
        }
    }

    assessment.helps = SensoryVariable::ALL
        .into_iter()
        .filter(|v| helped.contains(v))
        .collect();

    assessment
}

/// Scores a single relevant mapping into a recommendation
pub fn score_mapping(
    mapping: EffectMapping,
    gaps: &SensoryGaps,
    dismissed: &HashSet<Uuid>,
) -> Recommendation {
    let assessment = assess(&mapping, gaps);
    let score = assessment.score();
    let is_dismissed = dismissed.contains(&mapping.id);

    Recommendation {
        helps_count: assessment.helps.len(),
        helps_gaps: assessment
            .helps
            .iter()
            .map(|v| v.label().to_string())
            .collect(),
        has_conflict: assessment.has_conflict,
        score,
        is_dismissed,
        mapping,
    }
}

/// Descending score, then ascending name (byte-wise, case-sensitive)
pub fn rank_order(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.mapping.name.cmp(&b.mapping.name))
        .then_with(|| a.mapping.id.cmp(&b.mapping.id))
}

/// Scores and ranks relevant mappings.
///
/// Dismissed mappings stay in the list, flagged via `is_dismissed`; hiding
/// them is the caller's decision.
pub fn rank(
    mappings: Vec<EffectMapping>,
    gaps: &SensoryGaps,
    dismissed: &HashSet<Uuid>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = mappings
        .into_iter()
        .map(|mapping| score_mapping(mapping, gaps, dismissed))
        .collect();

    recommendations.sort_by(rank_order);
    recommendations
}
