pub mod dismissal;
pub mod experiment;
pub mod mapping;
pub mod recommendation;
pub mod sensory;

pub use dismissal::{DismissedMappingsResponse, ExperimentMappingDismissal};
pub use experiment::Experiment;
pub use mapping::{
    ChangeDirection, Confidence, Effect, EffectDirection, EffectMapping, OutputVariable,
};
pub use recommendation::{
    ExperimentWithGaps, ExperimentsWithGapsResponse, Pagination, Recommendation,
    RecommendationsResponse,
};
pub use sensory::{GapDirection, SensoryGap, SensoryGaps, SensoryScores, SensoryVariable};
