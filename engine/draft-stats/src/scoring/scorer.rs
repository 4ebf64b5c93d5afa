// Weekly scoring of a single card

use crate::error::{Result, StatsError};
use crate::models::{CardScores, PositionGroup, Score, ScoreObject, ScoreRoster, Scores};
use std::collections::HashMap;
use tracing::debug;

/// Round to two decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Roster slot chosen for the flex position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexPick {
    pub group: PositionGroup,
    pub index: usize,
}

/// Scores cards against one week of team fantasy points
///
/// Built once per week and shared read-only across card tasks.
#[derive(Debug, Clone, Default)]
pub struct RosterScorer {
    teams: HashMap<String, Score>,
}

impl RosterScorer {
    pub fn new(scores: &Scores) -> Self {
        Self { teams: scores.by_team() }
    }

    /// Recompute weekly scores, pick starters and roll season totals forward
    pub fn score_card(&self, mut card: CardScores) -> Result<CardScores> {
        Self::check_roster(&card)?;

        for group in PositionGroup::ALL {
            let slots = card.roster.group_mut(group);
            for slot in slots.iter_mut() {
                slot.score_week = self.points_for(group, slot);
            }
            sort_by_week_score(slots);
        }

        let flex = select_flex(&card.roster);
        let flex_points = flex.map_or(0.0, |pick| card.roster.group(pick.group)[pick.index].score_week);

        let roster = &card.roster;
        card.score_week = round2(
            roster.dst[0].score_week
                + roster.qb[0].score_week
                + roster.rb[0].score_week
                + roster.rb[1].score_week
                + roster.te[0].score_week
                + roster.wr[0].score_week
                + roster.wr[1].score_week
                + flex_points,
        );

        for group in PositionGroup::ALL {
            let guaranteed = group.guaranteed_starters();
            for (index, slot) in card.roster.group_mut(group).iter_mut().enumerate() {
                let is_flex = flex == Some(FlexPick { group, index });
                if index < guaranteed || is_flex {
                    slot.score_season = round2(slot.prev_week_season_contribution + slot.score_week);
                    slot.is_used_in_card_score = true;
                } else {
                    slot.score_season = round2(slot.prev_week_season_contribution);
                    slot.is_used_in_card_score = false;
                }
            }
        }

        card.score_season = card.prev_week_season_score + card.score_week;
        Ok(card)
    }

    fn check_roster(card: &CardScores) -> Result<()> {
        for group in PositionGroup::ALL {
            let have = card.roster.group(group).len();
            let need = group.guaranteed_starters();
            if have < need {
                return Err(StatsError::IncompleteRoster {
                    card_id: card.card_id.clone(),
                    reason: format!("{group} has {have} players, {need} required"),
                });
            }
        }
        Ok(())
    }

    /// Weekly points a slot earns from its team's line
    fn points_for(&self, group: PositionGroup, slot: &ScoreObject) -> f64 {
        let Some(team) = self.teams.get(&slot.team) else {
            debug!("No {} score for team {:?}, counting 0", group, slot.team);
            return 0.0;
        };

        match group {
            PositionGroup::Dst => team.dst,
            PositionGroup::Qb => team.qb,
            PositionGroup::Te => team.te,
            PositionGroup::Rb if slot_suffix(&slot.player_id) == "RB2" => team.rb2,
            PositionGroup::Rb => team.rb,
            PositionGroup::Wr if slot_suffix(&slot.player_id) == "WR2" => team.wr2,
            PositionGroup::Wr => team.wr,
        }
    }
}

/// Trailing `-` separated segment of a player id (`BUF-RB2` -> `RB2`)
fn slot_suffix(player_id: &str) -> &str {
    player_id.rsplit('-').next().unwrap_or(player_id)
}

/// Stable descending sort by weekly score
fn sort_by_week_score(slots: &mut [ScoreObject]) {
    slots.sort_by(|a, b| b.score_week.total_cmp(&a.score_week));
}

/// Best bench player among RB, TE and WR past their guaranteed starters.
///
/// Candidates are visited RB, then TE, then WR, and only a strictly higher
/// score replaces the current pick, so ties go to the earliest candidate.
pub fn select_flex(roster: &ScoreRoster) -> Option<FlexPick> {
    let mut best: Option<(FlexPick, f64)> = None;

    for group in PositionGroup::ALL.into_iter().filter(PositionGroup::is_flex_eligible) {
        let slots = roster.group(group);
        for index in group.guaranteed_starters()..slots.len() {
            let points = slots[index].score_week;
            if best.map_or(true, |(_, top)| points > top) {
                best = Some((FlexPick { group, index }, points));
            }
        }
    }

    best.map(|(pick, _)| pick)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(player_id: &str, team: &str, prev: f64) -> ScoreObject {
        ScoreObject {
            player_id: player_id.to_string(),
            team: team.to_string(),
            prev_week_season_contribution: prev,
            ..Default::default()
        }
    }

    fn team(name: &str, line: [f64; 7]) -> Score {
        let [dst, qb, rb, rb2, te, wr, wr2] = line;
        Score { dst, qb, rb, rb2, te, wr, wr2, team: name.to_string(), game_status: "Final".to_string() }
    }

    /// Each player comes from a different team so the weekly score is fully controlled
    fn week() -> Scores {
        Scores::new(vec![
            team("BUF", [8.0, 21.3, 0.0, 0.0, 0.0, 0.0, 0.0]),
            team("R1", [0.0, 0.0, 12.0, 0.0, 0.0, 0.0, 0.0]),
            team("R2", [0.0, 0.0, 0.0, 9.0, 0.0, 0.0, 0.0]),
            team("R3", [0.0, 0.0, 15.0, 0.0, 0.0, 0.0, 0.0]),
            team("R4", [0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0]),
            team("T1", [0.0, 0.0, 0.0, 0.0, 6.5, 0.0, 0.0]),
            team("T2", [0.0, 0.0, 0.0, 0.0, 11.0, 0.0, 0.0]),
            team("W1", [0.0, 0.0, 0.0, 0.0, 0.0, 17.2, 0.0]),
            team("W2", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 13.0]),
            team("W3", [0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 0.0]),
        ])
    }

    fn card() -> CardScores {
        CardScores {
            card_id: "77".to_string(),
            roster: ScoreRoster {
                dst: vec![slot("BUF-DST", "BUF", 20.0)],
                qb: vec![slot("BUF-QB", "BUF", 40.0)],
                rb: vec![
                    slot("R1-RB1", "R1", 1.0),
                    slot("R2-RB2", "R2", 2.0),
                    slot("R3-RB1", "R3", 3.0),
                    slot("R4-RB1", "R4", 4.0),
                ],
                te: vec![slot("T2-TE", "T2", 5.0), slot("T1-TE", "T1", 6.0)],
                wr: vec![slot("W1-WR1", "W1", 7.0), slot("W2-WR2", "W2", 8.0), slot("W3-WR1", "W3", 9.0)],
            },
            prev_week_season_score: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-2.5551), -2.56);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn test_rb_sort_and_starters() {
        let scored = RosterScorer::new(&week()).score_card(card()).unwrap();
        let rb: Vec<f64> = scored.roster.rb.iter().map(|s| s.score_week).collect();
        assert_eq!(rb, vec![15.0, 12.0, 9.0, 4.0]);

        assert!(scored.roster.rb[0].is_used_in_card_score);
        assert!(scored.roster.rb[1].is_used_in_card_score);
        // The TE at 6.5 beats nobody, the RB at 9 loses flex to WR 10
        assert!(!scored.roster.rb[2].is_used_in_card_score);
        assert!(!scored.roster.rb[3].is_used_in_card_score);
        assert_eq!(scored.roster.rb[3].score_season, 4.0);
    }

    #[test]
    fn test_secondary_slot_suffix() {
        let scored = RosterScorer::new(&week()).score_card(card()).unwrap();
        let rb2 = scored.roster.rb.iter().find(|s| s.player_id == "R2-RB2").unwrap();
        assert_eq!(rb2.score_week, 9.0);
        let wr2 = scored.roster.wr.iter().find(|s| s.player_id == "W2-WR2").unwrap();
        assert_eq!(wr2.score_week, 13.0);
    }

    #[test]
    fn test_suffix_needs_dash_separator() {
        assert_eq!(slot_suffix("BUF-RB2"), "RB2");
        assert_eq!(slot_suffix("BUFRB2"), "BUFRB2");

        let scorer = RosterScorer::new(&Scores::new(vec![team("BUF", [0.0, 0.0, 1.0, 5.0, 0.0, 0.0, 0.0])]));
        assert_eq!(scorer.points_for(PositionGroup::Rb, &slot("BUFRB2", "BUF", 0.0)), 1.0);
        assert_eq!(scorer.points_for(PositionGroup::Rb, &slot("BUF-RB2", "BUF", 0.0)), 5.0);
    }

    #[test]
    fn test_flex_goes_to_highest_across_groups() {
        let mut roster = ScoreRoster::default();
        roster.rb = vec![
            ScoreObject { score_week: 20.0, ..Default::default() },
            ScoreObject { score_week: 18.0, ..Default::default() },
            ScoreObject { score_week: 9.0, ..Default::default() },
        ];
        roster.te = vec![
            ScoreObject { score_week: 14.0, ..Default::default() },
            ScoreObject { score_week: 11.0, ..Default::default() },
        ];
        roster.wr = vec![
            ScoreObject { score_week: 16.0, ..Default::default() },
            ScoreObject { score_week: 15.0, ..Default::default() },
            ScoreObject { score_week: 10.0, ..Default::default() },
        ];

        assert_eq!(select_flex(&roster), Some(FlexPick { group: PositionGroup::Te, index: 1 }));
    }

    #[test]
    fn test_flex_tie_prefers_earliest_candidate() {
        let mut roster = ScoreRoster::default();
        let tied = ScoreObject { score_week: 7.0, ..Default::default() };
        roster.rb = vec![ScoreObject::default(), ScoreObject::default(), tied.clone()];
        roster.wr = vec![ScoreObject::default(), ScoreObject::default(), tied];

        assert_eq!(select_flex(&roster), Some(FlexPick { group: PositionGroup::Rb, index: 2 }));
    }

    #[test]
    fn test_flex_pick_advances_only_that_entry() {
        let mut scores = week();
        // Lift the bench TE above every other flex candidate
        scores.fantasy_points[5].te = 10.5;
        let scored = RosterScorer::new(&scores).score_card(card()).unwrap();

        assert_eq!(scored.roster.te[1].player_id, "T1-TE");
        assert!(scored.roster.te[1].is_used_in_card_score);
        assert_eq!(scored.roster.te[1].score_season, 16.5);
        assert!(!scored.roster.rb[2].is_used_in_card_score);
        assert!(!scored.roster.wr[2].is_used_in_card_score);
        assert_eq!(scored.roster.wr[2].score_season, 9.0);
    }

    #[test]
    fn test_week_and_season_totals() {
        let scored = RosterScorer::new(&week()).score_card(card()).unwrap();
        // DST 8 + QB 21.3 + RB 15 + 12 + TE 11 + WR 17.2 + 13 + flex WR 10
        assert_eq!(scored.score_week, 107.5);
        assert_eq!(scored.score_season, 157.5);
        assert_eq!(scored.roster.qb[0].score_season, 61.3);
        assert!(scored.roster.wr[2].is_used_in_card_score);
        assert_eq!(scored.roster.wr[2].score_season, 19.0);
    }

    #[test]
    fn test_season_rollover_is_not_rounded_again() {
        let scores = Scores::new(vec![team("X", [1.0, 2.0, 1.5, 1.5, 1.84, 1.5, 1.5])]);
        let mut card = CardScores { prev_week_season_score: 50.0, ..Default::default() };
        card.roster.dst = vec![slot("X-DST", "X", 0.004)];
        card.roster.qb = vec![slot("X-QB", "X", 0.0)];
        card.roster.rb = vec![slot("X-RB1", "X", 0.0), slot("X-RB2", "X", 0.0)];
        card.roster.te = vec![slot("X-TE", "X", 0.0)];
        card.roster.wr = vec![slot("X-WR1", "X", 0.0), slot("X-WR2", "X", 0.0)];

        let scored = RosterScorer::new(&scores).score_card(card).unwrap();
        assert_eq!(scored.score_week, 10.84);
        assert_eq!(scored.score_season, 50.0 + 10.84);
        assert_eq!(scored.roster.dst[0].score_season, 1.0);
    }

    #[test]
    fn test_missing_team_scores_zero() {
        let mut card = card();
        card.roster.qb[0].team = "BYE".to_string();
        let scored = RosterScorer::new(&week()).score_card(card).unwrap();
        assert_eq!(scored.roster.qb[0].score_week, 0.0);
        assert_eq!(scored.roster.qb[0].score_season, 40.0);
    }

    #[test]
    fn test_empty_flex_pool() {
        let mut card = card();
        card.roster.rb.truncate(2);
        card.roster.te.truncate(1);
        card.roster.wr.truncate(2);

        assert_eq!(select_flex(&card.roster), None);
        let scored = RosterScorer::new(&week()).score_card(card).unwrap();
        // Only R1 and R2 remain in the RB group
        assert_eq!(scored.score_week, round2(8.0 + 21.3 + 12.0 + 9.0 + 11.0 + 17.2 + 13.0));
    }

    #[test]
    fn test_incomplete_roster_rejected() {
        let mut card = card();
        card.roster.wr.truncate(1);

        match RosterScorer::new(&week()).score_card(card) {
            Err(StatsError::IncompleteRoster { card_id, reason }) => {
                assert_eq!(card_id, "77");
                assert!(reason.starts_with("WR"));
            }
            other => panic!("expected incomplete roster, got {other:?}"),
        }
    }
}
