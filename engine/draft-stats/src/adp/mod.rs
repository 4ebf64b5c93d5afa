//! Average draft position aggregation
//!
//! Collectors read finished drafts concurrently and stream their picks to a
//! single aggregator, which owns the per-player pick lists and writes a new
//! stats snapshot once every collector has finished.

pub mod aggregator;
pub mod collector;
pub mod pipeline;

pub use aggregator::{AdpAggregator, AggregationSummary};
pub use collector::{LeagueOutcome, PickCollector};
pub use pipeline::{AdpPipeline, AdpReport};
