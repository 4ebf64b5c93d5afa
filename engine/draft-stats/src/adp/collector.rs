// Per-league pick extraction

use crate::config::CollectionLayout;
use crate::models::{DraftSummary, PickInfo};
use draft_store::{DocumentStore, DocumentStoreExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// What one league contributed to an aggregation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueOutcome {
    /// Number of pick events delivered to the aggregator
    Emitted(usize),
    /// The summary could not be read or the aggregator went away
    Failed,
}

/// Reads one league's draft summary and forwards its picks
#[derive(Clone)]
pub struct PickCollector {
    store: Arc<dyn DocumentStore>,
    layout: CollectionLayout,
}

impl PickCollector {
    pub fn new(store: Arc<dyn DocumentStore>, layout: CollectionLayout) -> Self {
        Self { store, layout }
    }

    /// Pick events of a summary, in draft order
    pub fn collect(summary: &DraftSummary) -> Vec<PickInfo> {
        summary.summary.iter().map(|player| PickInfo::new(player.player_id.clone(), player.pick_num)).collect()
    }

    /// Emit every pick of `league_id` into `picks`.
    ///
    /// Failures are logged here and never escalate: the league simply
    /// contributes nothing.
    pub async fn run(&self, league_id: &str, picks: mpsc::Sender<PickInfo>) -> LeagueOutcome {
        let collection = self.layout.summary_collection(league_id);
        let summary: draft_store::Result<DraftSummary> =
            self.store.read_as(&collection, &self.layout.summary_document).await;

        let summary = match summary {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to read draft summary for league {}: {}", league_id, e);
                return LeagueOutcome::Failed;
            }
        };

        let events = Self::collect(&summary);
        let count = events.len();
        for event in events {
            if picks.send(event).await.is_err() {
                error!("Pick channel closed while emitting league {}", league_id);
                return LeagueOutcome::Failed;
            }
        }

        debug!("League {} emitted {} picks", league_id, count);
        LeagueOutcome::Emitted(count)
    }
}
