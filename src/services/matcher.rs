use crate::models::{EffectMapping, SensoryGaps};

/// Whether any actionable effect of `mapping` touches an active gap.
///
/// Conflicting effects count: they have to reach the scorer to be penalized.
pub fn is_relevant(mapping: &EffectMapping, gaps: &SensoryGaps) -> bool {
    mapping.active
        && mapping
            .effects
            .iter()
            .filter_map(|effect| effect.actionable_variable())
            .any(|variable| gaps.get(variable).is_active())
}

/// Narrows a catalog down to the mappings worth scoring
pub fn find_relevant<'a, I>(mappings: I, gaps: &SensoryGaps) -> Vec<EffectMapping>
where
    I: IntoIterator<Item = &'a EffectMapping>,
{
    mappings
        .into_iter()
        .filter(|mapping| is_relevant(mapping, gaps))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ChangeDirection, Confidence, Effect, EffectDirection, OutputVariable, SensoryGap,
    };
    use uuid::Uuid;

    fn gaps_with_acidity(current: i32, target: i32) -> SensoryGaps {
        let on_target = SensoryGap::new(None, None, 0);
        SensoryGaps {
            acidity: SensoryGap::new(Some(current), Some(target), 0),
            sweetness: on_target,
            bitterness: on_target,
            body: on_target,
            aroma: on_target,
        }
    }

    fn mapping(name: &str, effects: Vec<Effect>) -> EffectMapping {
        effects.into_iter().fold(
            EffectMapping::new(Uuid::new_v4(), name, "temperature", ChangeDirection::Increase),
            EffectMapping::with_effect,
        )
    }

    #[test]
    fn test_helping_effect_is_relevant() {
        let m = mapping(
            "Hotter",
            vec![Effect::new(OutputVariable::Acidity, EffectDirection::Increase, Confidence::High)],
        );
        assert!(is_relevant(&m, &gaps_with_acidity(3, 6)));
    }

    #[test]
    fn test_conflicting_effect_is_relevant() {
        let m = mapping(
            "Cooler",
            vec![Effect::new(OutputVariable::Acidity, EffectDirection::Decrease, Confidence::High)],
        );
        assert!(is_relevant(&m, &gaps_with_acidity(3, 6)));
    }

    #[test]
    fn test_none_effect_never_matches() {
        let m = mapping(
            "Swirl",
            vec![Effect::new(OutputVariable::Acidity, EffectDirection::NoEffect, Confidence::High)],
        );
        assert!(!is_relevant(&m, &gaps_with_acidity(3, 6)));
    }

    #[test]
    fn test_effect_on_gapless_variable_is_irrelevant() {
        let m = mapping(
            "Longer bloom",
            vec![
                Effect::new(OutputVariable::Body, EffectDirection::Increase, Confidence::Medium),
                Effect::new(OutputVariable::Overall, EffectDirection::Increase, Confidence::High),
            ],
        );
        assert!(!is_relevant(&m, &gaps_with_acidity(3, 6)));
    }

    #[test]
    fn test_inactive_mapping_is_excluded() {
        let m = mapping(
            "Hotter",
            vec![Effect::new(OutputVariable::Acidity, EffectDirection::Increase, Confidence::High)],
        )
        .inactive();
        assert!(!is_relevant(&m, &gaps_with_acidity(3, 6)));
    }

    #[test]
    fn test_empty_gap_set_returns_empty() {
        let catalog = vec![mapping(
            "Hotter",
            vec![Effect::new(OutputVariable::Acidity, EffectDirection::Increase, Confidence::High)],
        )];
        assert!(find_relevant(&catalog, &gaps_with_acidity(5, 5)).is_empty());
    }

    #[test]
    fn test_find_relevant_filters_catalog() {
        let catalog = vec![
            mapping(
                "Hotter",
                vec![Effect::new(OutputVariable::Acidity, EffectDirection::Increase, Confidence::High)],
            ),
            mapping(
                "Finer",
                vec![Effect::new(OutputVariable::Body, EffectDirection::Increase, Confidence::High)],
            ),
        ];

        let relevant = find_relevant(&catalog, &gaps_with_acidity(3, 6));
        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].name, "Hotter");
    }
}
