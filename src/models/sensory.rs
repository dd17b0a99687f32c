use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The sensory attributes a taster can set targets for
///
/// Declaration order is the canonical gap order used in every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensoryVariable {
    Acidity,
    Sweetness,
    Bitterness,
    Body,
    Aroma,
}

impl SensoryVariable {
    pub const ALL: [SensoryVariable; 5] = [
        SensoryVariable::Acidity,
        SensoryVariable::Sweetness,
        SensoryVariable::Bitterness,
        SensoryVariable::Body,
        SensoryVariable::Aroma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensoryVariable::Acidity => "acidity",
            SensoryVariable::Sweetness => "sweetness",
            SensoryVariable::Bitterness => "bitterness",
            SensoryVariable::Body => "body",
            SensoryVariable::Aroma => "aroma",
        }
    }

    /// Human-facing label, as shown in `helps_gaps`
    pub fn label(&self) -> &'static str {
        match self {
            SensoryVariable::Acidity => "Acidity",
            SensoryVariable::Sweetness => "Sweetness",
            SensoryVariable::Bitterness => "Bitterness",
            SensoryVariable::Body => "Body",
            SensoryVariable::Aroma => "Aroma",
        }
    }
}

impl Display for SensoryVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which way a measured value has to move to reach its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    Increase,
    Decrease,
    OnTarget,
}

impl GapDirection {
    /// Direction rule for one attribute.
    ///
    /// A missing measurement or a missing target counts as on target: a partial
    /// target profile means "nothing to fix here", not "unknown".
    pub fn between(current: Option<i32>, target: Option<i32>, tolerance: u32) -> Self {
        let (Some(current), Some(target)) = (current, target) else {
            return GapDirection::OnTarget;
        };

        if current.abs_diff(target) <= tolerance {
            GapDirection::OnTarget
        } else if current < target {
            GapDirection::Increase
        } else {
            GapDirection::Decrease
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, GapDirection::OnTarget)
    }
}

/// Measured-vs-target state of a single sensory attribute
///
/// The direction is derived on construction and cannot be set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensoryGap {
    current: Option<i32>,
    target: Option<i32>,
    direction: GapDirection,
}

impl SensoryGap {
    pub fn new(current: Option<i32>, target: Option<i32>, tolerance: u32) -> Self {
        Self {
            current,
            target,
            direction: GapDirection::between(current, target, tolerance),
        }
    }

    pub fn current(&self) -> Option<i32> {
        self.current
    }

    pub fn target(&self) -> Option<i32> {
        self.target
    }

    pub fn direction(&self) -> GapDirection {
        self.direction
    }

    /// Signed distance `target - current`, when both are recorded
    pub fn delta(&self) -> Option<i32> {
        Some(self.target? - self.current?)
    }

    pub fn is_active(&self) -> bool {
        self.direction.is_active()
    }
}

/// One experiment's gaps across all five attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensoryGaps {
    pub acidity: SensoryGap,
    pub sweetness: SensoryGap,
    pub bitterness: SensoryGap,
    pub body: SensoryGap,
    pub aroma: SensoryGap,
}

impl SensoryGaps {
    pub fn get(&self, variable: SensoryVariable) -> &SensoryGap {
        match variable {
            SensoryVariable::Acidity => &self.acidity,
            SensoryVariable::Sweetness => &self.sweetness,
            SensoryVariable::Bitterness => &self.bitterness,
            SensoryVariable::Body => &self.body,
            SensoryVariable::Aroma => &self.aroma,
        }
    }

    /// All attributes in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SensoryVariable, &SensoryGap)> + '_ {
        SensoryVariable::ALL.into_iter().map(|v| (v, self.get(v)))
    }

    /// Active gaps in canonical order, paired with the direction that closes them
    pub fn active(&self) -> Vec<(SensoryVariable, GapDirection)> {
        self.iter()
            .filter(|(_, gap)| gap.is_active())
            .map(|(v, gap)| (v, gap.direction()))
            .collect()
    }

    /// Desired direction for `variable`, or `None` when it has no active gap
    pub fn desired(&self, variable: SensoryVariable) -> Option<GapDirection> {
        let gap = self.get(variable);
        gap.is_active().then(|| gap.direction())
    }
}

/// Five optional sensory values, either measured or targeted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryScores {
    pub acidity: Option<i32>,
    pub sweetness: Option<i32>,
    pub bitterness: Option<i32>,
    pub body: Option<i32>,
    pub aroma: Option<i32>,
}

impl SensoryScores {
    pub fn get(&self, variable: SensoryVariable) -> Option<i32> {
        match variable {
            SensoryVariable::Acidity => self.acidity,
            SensoryVariable::Sweetness => self.sweetness,
            SensoryVariable::Bitterness => self.bitterness,
            SensoryVariable::Body => self.body,
            SensoryVariable::Aroma => self.aroma,
        }
    }
}
