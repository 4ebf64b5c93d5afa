//! # Draft Stats
//!
//! Derived statistics for draft leagues:
//!
//! - **ADP**: average draft position per player across every locked league,
//!   merged into a new snapshot of the season stats table
//! - **Scoring**: weekly and season scores for each drafted card, with
//!   starter and flex selection
//!
//! Both pipelines take an explicitly constructed [`draft_store::DocumentStore`]
//! handle and bound the number of in-flight per-item tasks with a
//! [`BoundedFanout`].
//!
//! ## Usage
//!
//! ```rust
//! use draft_stats::{PipelineConfig, ScoringPipeline, Scores};
//! use draft_store::InMemoryDocumentStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryDocumentStore::new());
//!     let pipeline = ScoringPipeline::new(store, PipelineConfig::default());
//!
//!     let report = pipeline.score_draft_tokens("2023REG-01", &Scores::default()).await?;
//!     assert_eq!(report.tokens_total, 0);
//!     Ok(())
//! }
//! ```

pub mod adp;
pub mod config;
pub mod error;
pub mod fanout;
pub mod models;
pub mod scoring;


pub use adp::{AdpAggregator, AdpPipeline, AdpReport, LeagueOutcome, PickCollector};
pub use config::{CollectionLayout, PipelineConfig};
pub use error::{Result, StatsError};
pub use fanout::{BoundedFanout, FanoutReport};
pub use models::*;
pub use scoring::{RosterScorer, ScoringPipeline, ScoringReport};
