pub mod dismissals;
pub mod gaps;
pub mod matcher;
pub mod recommendations;
pub mod scorer;

pub use dismissals::DismissalLedger;
pub use recommendations::RecommendationEngine;
