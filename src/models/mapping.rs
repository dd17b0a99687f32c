use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::sensory::{GapDirection, SensoryVariable};

/// Direction a controllable brew variable was changed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
}

impl ChangeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Increase => "increase",
            ChangeDirection::Decrease => "decrease",
        }
    }
}

impl FromStr for ChangeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(ChangeDirection::Increase),
            "decrease" => Ok(ChangeDirection::Decrease),
            other => Err(format!("unknown change direction '{}'", other)),
        }
    }
}

/// Direction an effect pushes an output variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectDirection {
    Increase,
    Decrease,
    /// Documents that the change does not move this output
    #[serde(rename = "none")]
    NoEffect,
}

impl EffectDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectDirection::Increase => "increase",
            EffectDirection::Decrease => "decrease",
            EffectDirection::NoEffect => "none",
        }
    }

    /// Whether moving in this direction closes (`Some(true)`) or widens
    /// (`Some(false)`) a gap. `None` when there is nothing to compare.
    pub fn closes(&self, gap: GapDirection) -> Option<bool> {
        match (self, gap) {
            (EffectDirection::NoEffect, _) | (_, GapDirection::OnTarget) => None,
            (EffectDirection::Increase, GapDirection::Increase)
            | (EffectDirection::Decrease, GapDirection::Decrease) => Some(true),
            (EffectDirection::Increase, GapDirection::Decrease)
            | (EffectDirection::Decrease, GapDirection::Increase) => Some(false),
        }
    }
}

impl FromStr for EffectDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(EffectDirection::Increase),
            "decrease" => Ok(EffectDirection::Decrease),
            "none" => Ok(EffectDirection::NoEffect),
            other => Err(format!("unknown effect direction '{}'", other)),
        }
    }
}

/// Authored certainty of a single effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Score contribution of a helping effect
    pub fn weight(&self) -> i32 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            other => Err(format!("unknown confidence '{}'", other)),
        }
    }
}

/// Output variables an effect can describe
///
/// Everything but `Aftertaste` and `Overall` has a matching sensory gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputVariable {
    Acidity,
    Sweetness,
    Bitterness,
    Body,
    Aroma,
    Aftertaste,
    Overall,
}

impl OutputVariable {
    pub fn sensory(&self) -> Option<SensoryVariable> {
        match self {
            OutputVariable::Acidity => Some(SensoryVariable::Acidity),
            OutputVariable::Sweetness => Some(SensoryVariable::Sweetness),
            OutputVariable::Bitterness => Some(SensoryVariable::Bitterness),
            OutputVariable::Body => Some(SensoryVariable::Body),
            OutputVariable::Aroma => Some(SensoryVariable::Aroma),
            OutputVariable::Aftertaste | OutputVariable::Overall => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputVariable::Acidity => "acidity",
            OutputVariable::Sweetness => "sweetness",
            OutputVariable::Bitterness => "bitterness",
            OutputVariable::Body => "body",
            OutputVariable::Aroma => "aroma",
            OutputVariable::Aftertaste => "aftertaste",
            OutputVariable::Overall => "overall",
        }
    }
}

impl From<SensoryVariable> for OutputVariable {
    fn from(variable: SensoryVariable) -> Self {
        match variable {
            SensoryVariable::Acidity => OutputVariable::Acidity,
            SensoryVariable::Sweetness => OutputVariable::Sweetness,
            SensoryVariable::Bitterness => OutputVariable::Bitterness,
            SensoryVariable::Body => OutputVariable::Body,
            SensoryVariable::Aroma => OutputVariable::Aroma,
        }
    }
}

impl FromStr for OutputVariable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "acidity" => Ok(OutputVariable::Acidity),
            "sweetness" => Ok(OutputVariable::Sweetness),
            "bitterness" => Ok(OutputVariable::Bitterness),
            "body" => Ok(OutputVariable::Body),
            "aroma" => Ok(OutputVariable::Aroma),
            "aftertaste" => Ok(OutputVariable::Aftertaste),
            "overall" => Ok(OutputVariable::Overall),
            other => Err(format!("unknown output variable '{}'", other)),
        }
    }
}

/// One believed consequence of a mapping's change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub output_variable: OutputVariable,
    pub direction: EffectDirection,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub confidence: Confidence,
}

impl Effect {
    pub fn new(
        output_variable: OutputVariable,
        direction: EffectDirection,
        confidence: Confidence,
    ) -> Self {
        Self {
            output_variable,
            direction,
            range_min: None,
            range_max: None,
            confidence,
        }
    }

    /// The sensory attribute this effect can act on, if any.
    ///
    /// `none` effects and effects on non-gap outputs never participate in
    /// matching or scoring.
    pub fn actionable_variable(&self) -> Option<SensoryVariable> {
        match self.direction {
            EffectDirection::NoEffect => None,
            _ => self.output_variable.sensory(),
        }
    }
}

/// Authored cause-and-effect fact about one brew variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectMapping {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Controllable input, e.g. "temperature"
    pub variable: String,
    pub direction: ChangeDirection,
    pub tick_description: String,
    pub active: bool,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub effects: Vec<Effect>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EffectMapping {
    /// Creates an active mapping with no effects
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        variable: impl Into<String>,
        direction: ChangeDirection,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            variable: variable.into(),
            direction,
            tick_description: String::new(),
            active: true,
            source: None,
            notes: None,
            effects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_tick_description(mut self, description: impl Into<String>) -> Self {
        self.tick_description = description.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
