use crate::models::{Experiment, SensoryGap, SensoryGaps};

/// Computes the measured-vs-target gaps for one experiment snapshot
///
/// Never fails: unrecorded values produce on-target gaps so that a partial
/// target profile still yields recommendations for the attributes that are set.
pub fn compute_gaps(experiment: &Experiment, tolerance: u32) -> SensoryGaps {
    let gap = |current, target| SensoryGap::new(current, target, tolerance);
    let (measured, target) = (&experiment.measured, &experiment.target);

    SensoryGaps {
        acidity: gap(measured.acidity, target.acidity),
        sweetness: gap(measured.sweetness, target.sweetness),
        bitterness: gap(measured.bitterness, target.bitterness),
        body: gap(measured.body, target.body),
        aroma: gap(measured.aroma, target.aroma),
    }
}

/// Number of attributes that are off target
pub fn count_active_gaps(gaps: &SensoryGaps) -> usize {
    gaps.iter().filter(|(_, gap)| gap.is_active()).count()
}
