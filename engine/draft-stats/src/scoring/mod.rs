//! Weekly roster scoring for draft cards

pub mod pipeline;
pub mod scorer;

pub use pipeline::{CardOutcome, ScoringPipeline, ScoringReport};
pub use scorer::{round2, select_flex, FlexPick, RosterScorer};
