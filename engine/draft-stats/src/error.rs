//! Error types for the draft statistics pipelines

use draft_store::StoreError;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur while aggregating ADP or scoring cards
#[derive(Error, Debug)]
pub enum StatsError {
    /// Missing, malformed or unreachable documents
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Card {card_id} has an incomplete roster: {reason}")]
    IncompleteRoster { card_id: String, reason: String },

    #[error("ADP aggregation failed: {0}")]
    Aggregator(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Admission gate or task join failures
    #[error("Concurrency error: {0}")]
    Concurrency(String),
}

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}
