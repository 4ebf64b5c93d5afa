// ADP pipeline controller: fan-out over locked leagues, fan-in to the aggregator

use super::aggregator::AdpAggregator;
use super::collector::{LeagueOutcome, PickCollector};
use crate::config::PipelineConfig;
use crate::error::{Result, StatsError};
use crate::fanout::BoundedFanout;
use crate::models::League;
use draft_store::DocumentStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Counters describing one ADP run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdpReport {
    pub leagues_total: usize,
    pub leagues_locked: usize,
    pub leagues_skipped: usize,
    pub leagues_failed: usize,
    pub picks_collected: usize,
    pub players_ranked: usize,
    pub players_persisted: usize,
}

/// Computes average draft position across every locked league
pub struct AdpPipeline {
    store: Arc<dyn DocumentStore>,
    config: PipelineConfig,
}

impl AdpPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    /// Run one full aggregation.
    ///
    /// Returns only after every collector has finished, the aggregator has
    /// been told to stop, and the snapshot has been written.
    pub async fn run(&self) -> Result<AdpReport> {
        let layout = &self.config.collections;

        let documents = self.store.list_documents(&layout.leagues).await?;
        let mut locked = Vec::new();
        for document in &documents {
            let league: League = document.decode(&layout.leagues)?;
            let league_id = if league.league_id.is_empty() { document.id.clone() } else { league.league_id };

            if !league.is_locked {
                debug!("League {} is not locked, skipping", league_id);
                continue;
            }
            locked.push(league_id);
        }

        let mut report = AdpReport {
            leagues_total: documents.len(),
            leagues_locked: locked.len(),
            leagues_skipped: documents.len() - locked.len(),
            ..Default::default()
        };
        info!("Calculating ADP over {} locked leagues ({} skipped)", report.leagues_locked, report.leagues_skipped);

        let (pick_tx, pick_rx) = mpsc::channel(self.config.pick_channel_capacity);
        let (stop_tx, stop_rx) = oneshot::channel();
        let aggregator = AdpAggregator::new(self.store.clone(), layout.clone());
        let aggregator_handle = tokio::spawn(aggregator.run(pick_rx, stop_rx));

        let collector = PickCollector::new(self.store.clone(), layout.clone());
        let mut fanout = BoundedFanout::new(self.config.max_concurrent_tasks)?;
        for league_id in locked {
            let collector = collector.clone();
            let picks = pick_tx.clone();
            fanout.spawn(async move { collector.run(&league_id, picks).await }).await?;
        }
        drop(pick_tx);

        // Join barrier: the stop signal must not be sent before every producer is done
        let collected = fanout.join().await;
        report.leagues_failed = collected.panicked
            + collected.outputs.iter().filter(|outcome| **outcome == LeagueOutcome::Failed).count();

        if stop_tx.send(()).is_err() {
            warn!("ADP aggregator exited before the stop signal");
        }

        let summary = aggregator_handle
            .await
            .map_err(|e| StatsError::Concurrency(format!("ADP aggregator task failed: {e}")))??;

        report.picks_collected = summary.picks_collected;
        report.players_ranked = summary.players_ranked;
        report.players_persisted = summary.players_persisted;

        info!(
            "ADP run complete: {} picks from {} leagues ({} failed), {} players ranked",
            report.picks_collected,
            report.leagues_locked - report.leagues_failed,
            report.leagues_failed,
            report.players_ranked
        );
        Ok(report)
    }
}
