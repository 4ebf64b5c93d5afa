// Configuration structures for the draft statistics pipelines

use serde::{Deserialize, Serialize};

/// Default number of per-item workers allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 40;

/// Default buffer between pick collectors and the ADP aggregator
pub const DEFAULT_PICK_CHANNEL_CAPACITY: usize = 1024;

/// Main configuration shared by the ADP and scoring pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Admission gate size for fanned-out workers
    pub max_concurrent_tasks: usize,

    /// Capacity of the pick event channel
    pub pick_channel_capacity: usize,

    /// Where each record kind lives in the document store
    pub collections: CollectionLayout,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            pick_channel_capacity: DEFAULT_PICK_CHANNEL_CAPACITY,
            collections: CollectionLayout::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_tasks == 0 {
            return Err("max_concurrent_tasks must be greater than 0".to_string());
        }

        if self.pick_channel_capacity == 0 {
            return Err("pick_channel_capacity must be greater than 0".to_string());
        }

        self.collections.validate()
    }
}

/// Persisted layout of leagues, summaries, stats tables, tokens and card scores
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionLayout {
    /// League records, one document per league id
    pub leagues: String,

    /// Sub-collection (under a league) holding its draft state
    pub draft_state: String,

    /// Draft summary document id inside the draft state collection
    pub summary_document: String,

    /// Player statistics table for the season
    pub stats_collection: String,

    /// Stats document read at the start of an ADP run
    pub stats_document: String,

    /// Stats document the new snapshot is written to
    pub stats_snapshot_document: String,

    /// Minted draft tokens, one document per card id
    pub draft_tokens: String,
}

impl Default for CollectionLayout {
    fn default() -> Self {
        Self {
            leagues: "drafts".to_string(),
            draft_state: "state".to_string(),
            summary_document: "summary".to_string(),
            stats_collection: "playerStats2023".to_string(),
            stats_document: "playerMap".to_string(),
            stats_snapshot_document: "newPlayerMap".to_string(),
            draft_tokens: "draftTokens".to_string(),
        }
    }
}

impl CollectionLayout {
    /// Collection holding the draft summary of `league_id`
    pub fn summary_collection(&self, league_id: &str) -> String {
        format!("{}/{}/{}", self.leagues, league_id, self.draft_state)
    }

    /// Collection holding the per-card scores of `league_id` for `game_week`
    pub fn card_scores_collection(&self, league_id: &str, game_week: &str) -> String {
        format!("{}/{}/scores/{}/cards", self.leagues, league_id, game_week)
    }

    fn validate(&self) -> Result<(), String> {
        let names = [
            ("leagues", &self.leagues),
            ("draft_state", &self.draft_state),
            ("summary_document", &self.summary_document),
            ("stats_collection", &self.stats_collection),
            ("stats_document", &self.stats_document),
            ("stats_snapshot_document", &self.stats_snapshot_document),
            ("draft_tokens", &self.draft_tokens),
        ];

        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(format!("collections.{field} must not be empty"));
            }
        }

        if self.stats_document == self.stats_snapshot_document {
            return Err("stats_snapshot_document must differ from stats_document".to_string());
        }

        Ok(())
    }
}
