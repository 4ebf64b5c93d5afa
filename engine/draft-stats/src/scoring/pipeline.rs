// Scoring pipeline controller: one independent task per drafted card

use super::scorer::RosterScorer;
use crate::config::{CollectionLayout, PipelineConfig};
use crate::error::Result;
use crate::fanout::BoundedFanout;
use crate::models::{CardScores, DraftToken, Scores};
use draft_store::{DocumentStore, DocumentStoreExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Counters describing one scoring run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringReport {
    pub tokens_total: usize,
    pub tokens_skipped: usize,
    pub cards_scored: usize,
    pub cards_failed: usize,
}

/// How a single card task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOutcome {
    Scored,
    Failed,
}

/// Scores every drafted card for one game week
pub struct ScoringPipeline {
    store: Arc<dyn DocumentStore>,
    config: PipelineConfig,
}

impl ScoringPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    pub async fn score_draft_tokens(&self, game_week: &str, scores: &Scores) -> Result<ScoringReport> {
        let layout = &self.config.collections;

        let documents = self.store.list_documents(&layout.draft_tokens).await?;
        let mut tokens = Vec::with_capacity(documents.len());
        for document in &documents {
            let mut token: DraftToken = document.decode(&layout.draft_tokens)?;
            if token.card_id.is_empty() {
                token.card_id = document.id.clone();
            }
            tokens.push(token);
        }

        let mut report = ScoringReport { tokens_total: tokens.len(), ..Default::default() };
        let scorer = Arc::new(RosterScorer::new(scores));
        let mut fanout = BoundedFanout::new(self.config.max_concurrent_tasks)?;

        for token in tokens {
            if !token.is_drafted() {
                debug!("Card {} has no drafted defense, skipping", token.card_id);
                report.tokens_skipped += 1;
                continue;
            }

            let store = self.store.clone();
            let layout = layout.clone();
            let scorer = scorer.clone();
            let game_week = game_week.to_string();
            fanout
                .spawn(async move { score_one(store.as_ref(), &layout, &scorer, &token, &game_week).await })
                .await?;
        }

        let scored = fanout.join().await;
        report.cards_scored = scored.outputs.iter().filter(|outcome| **outcome == CardOutcome::Scored).count();
        report.cards_failed = scored.panicked + scored.outputs.len() - report.cards_scored;

        info!(
            "Scored {} cards for week {} ({} failed, {} skipped)",
            report.cards_scored, game_week, report.cards_failed, report.tokens_skipped
        );
        Ok(report)
    }
}

async fn score_one(
    store: &dyn DocumentStore,
    layout: &CollectionLayout,
    scorer: &RosterScorer,
    token: &DraftToken,
    game_week: &str,
) -> CardOutcome {
    let collection = layout.card_scores_collection(&token.league_id, game_week);

    let card: draft_store::Result<CardScores> = store.read_as(&collection, &token.card_id).await;
    let card = match card {
        Ok(card) => card,
        Err(e) => {
            error!("Failed to read scores for card {}: {}", token.card_id, e);
            return CardOutcome::Failed;
        }
    };

    let card = match scorer.score_card(card) {
        Ok(card) => card,
        Err(e) => {
            warn!("Not scoring card {}: {}", token.card_id, e);
            return CardOutcome::Failed;
        }
    };

    if let Err(e) = store.write_as(&collection, &token.card_id, &card).await {
        error!("Failed to write scores for card {}: {}", token.card_id, e);
        return CardOutcome::Failed;
    }

    debug!("Card {} scored {} this week, {} season", token.card_id, card.score_week, card.score_season);
    CardOutcome::Scored
}
