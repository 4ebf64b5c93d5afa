// Single consumer of pick events, folds them into the stats table

use crate::config::CollectionLayout;
use crate::error::{Result, StatsError};
use crate::models::{DraftPositionTracker, PickInfo, StatsMap, StatsObject};
use draft_store::{DocumentStore, DocumentStoreExt};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Result of one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub picks_collected: usize,
    pub players_ranked: usize,
    pub players_persisted: usize,
}

/// Owns the [`DraftPositionTracker`] for one run and persists the ADP snapshot
pub struct AdpAggregator {
    store: Arc<dyn DocumentStore>,
    layout: CollectionLayout,
}

impl AdpAggregator {
    pub fn new(store: Arc<dyn DocumentStore>, layout: CollectionLayout) -> Self {
        Self { store, layout }
    }

    /// Consume picks until `stop` fires, then write the new stats snapshot.
    ///
    /// Buffered picks are always drained after the stop signal, so every
    /// event a producer delivered before the join barrier is counted. If the
    /// stop sender is dropped without firing, nothing is persisted.
    pub async fn run(
        self,
        mut picks: mpsc::Receiver<PickInfo>,
        mut stop: oneshot::Receiver<()>,
    ) -> Result<AggregationSummary> {
        let mut tracker = DraftPositionTracker::new();

        loop {
            tokio::select! {
                biased;

                Some(pick) = picks.recv() => tracker.record(pick),

                signal = &mut stop => {
                    if signal.is_err() {
                        return Err(StatsError::Aggregator(
                            "stop signal abandoned before producers finished".to_string(),
                        ));
                    }
                    break;
                }
            }
        }

        picks.close();
        while let Some(pick) = picks.recv().await {
            tracker.record(pick);
        }

        let picks_collected = tracker.pick_count();
        debug!("Aggregator stopped with {} picks for {} players", picks_collected, tracker.player_count());

        let stats: StatsMap =
            self.store.read_as(&self.layout.stats_collection, &self.layout.stats_document).await?;
        let snapshot = Self::fold(&tracker, stats);
        let players_persisted = snapshot.players.len();

        self.store
            .write_as(&self.layout.stats_collection, &self.layout.stats_snapshot_document, &snapshot)
            .await?;

        info!(
            "ADP snapshot written to {}/{} ({} players)",
            self.layout.stats_collection, self.layout.stats_snapshot_document, players_persisted
        );

        Ok(AggregationSummary { picks_collected, players_ranked: tracker.player_count(), players_persisted })
    }

    /// Merge the tracker's mean picks into a copy of `stats`.
    ///
    /// Players seen in a draft but missing from the table are added with
    /// default statistics. The empty-string key is dropped.
    pub fn fold(tracker: &DraftPositionTracker, stats: StatsMap) -> StatsMap {
        let mut players = stats.players;

        for player_id in tracker.player_ids() {
            let Some(adp) = tracker.average_pick(player_id) else {
                continue;
            };

            players
                .entry(player_id.to_string())
                .or_insert_with(|| StatsObject { player_id: player_id.to_string(), ..Default::default() })
                .adp = adp;
        }

        players.remove("");
        StatsMap { players }
    }
}
