use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Leagues and drafts
// ---------------------------------------------------------------------------

/// Participant of a league and the card they drafted into it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LeagueUser {
    pub owner_id: String,
    pub token_id: String,
}

/// League record as stored in the leagues collection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct League {
    pub league_id: String,
    pub display_name: String,
    pub current_users: Vec<LeagueUser>,
    pub num_players: i64,
    pub max_players: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub draft_type: String,
    pub level: String,
    /// Set once the draft has finished and the pick order is final
    pub is_locked: bool,
}

/// One drafted player inside a draft summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerInfo {
    /// Team and position slot, e.g. `BUFQB`
    pub player_id: String,
    pub display_name: String,
    pub team: String,
    pub position: String,
    /// Wallet address of the drafting user
    pub owner_address: String,
    pub pick_num: i64,
    pub round: i64,
}

/// Completed draft of one league, in pick order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DraftSummary {
    pub summary: Vec<PlayerInfo>,
}

/// A single observed pick, consumed once by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickInfo {
    pub player_id: String,
    pub pick_num: i64,
}

impl PickInfo {
    pub fn new(player_id: impl Into<String>, pick_num: i64) -> Self {
        Self { player_id: player_id.into(), pick_num }
    }
}

/// Pick numbers observed per player during one aggregation run
#[derive(Debug, Clone, Default)]
pub struct DraftPositionTracker {
    players: HashMap<String, Vec<i64>>,
}

impl DraftPositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pick: PickInfo) {
        self.players.entry(pick.player_id).or_default().push(pick.pick_num);
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn pick_count(&self) -> usize {
        self.players.values().map(Vec::len).sum()
    }

    /// Mean pick number of `player_id`.
    ///
    /// The sum is divided as an integer, so any fractional part is truncated
    /// before the value is widened to `f64`.
    pub fn average_pick(&self, player_id: &str) -> Option<f64> {
        let picks = self.players.get(player_id)?;
        if picks.is_empty() {
            return None;
        }
        let sum: i64 = picks.iter().sum();
        Some((sum / picks.len() as i64) as f64)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }
}

/// Season statistics of one player
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsObject {
    pub player_id: String,
    pub average_score: f64,
    pub highest_score: f64,
    pub top5_finishes: i64,
    pub bye_week: String,
    pub adp: f64,
    pub players_from_team: Vec<String>,
}

/// Player id -> statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsMap {
    pub players: HashMap<String, StatsObject>,
}

// ---------------------------------------------------------------------------
// Cards and scoring
// ---------------------------------------------------------------------------

/// Fantasy points one NFL team produced this week, per roster slot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Score {
    #[serde(rename = "DST")]
    pub dst: f64,
    #[serde(rename = "QB")]
    pub qb: f64,
    #[serde(rename = "RB")]
    pub rb: f64,
    #[serde(rename = "RB2")]
    pub rb2: f64,
    #[serde(rename = "TE")]
    pub te: f64,
    #[serde(rename = "WR")]
    pub wr: f64,
    #[serde(rename = "WR2")]
    pub wr2: f64,
    #[serde(rename = "GameStatus")]
    pub game_status: String,
    #[serde(rename = "Team")]
    pub team: String,
}

/// All team scores for one game week
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scores {
    #[serde(rename = "FantasyPoints")]
    pub fantasy_points: Vec<Score>,
}

impl Scores {
    pub fn new(fantasy_points: Vec<Score>) -> Self {
        Self { fantasy_points }
    }

    /// Team -> score lookup. A team listed twice keeps its last entry.
    pub fn by_team(&self) -> HashMap<String, Score> {
        self.fantasy_points.iter().map(|s| (s.team.clone(), s.clone())).collect()
    }
}

/// The closed set of roster position groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionGroup {
    Dst,
    Qb,
    Rb,
    Te,
    Wr,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 5] = [Self::Dst, Self::Qb, Self::Rb, Self::Te, Self::Wr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dst => "DST",
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Te => "TE",
            Self::Wr => "WR",
        }
    }

    /// Starters this group always fields
    pub fn guaranteed_starters(&self) -> usize {
        match self {
            Self::Dst | Self::Qb | Self::Te => 1,
            Self::Rb | Self::Wr => 2,
        }
    }

    /// Whether players past the guaranteed starters may fill the flex slot
    pub fn is_flex_eligible(&self) -> bool {
        matches!(self, Self::Rb | Self::Te | Self::Wr)
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player occupying a roster slot on a minted card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterPlayer {
    pub team: String,
    pub player_id: String,
    pub display_name: String,
}

/// Card-side roster: which players fill each position group
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Roster {
    #[serde(rename = "DST")]
    pub dst: Vec<RosterPlayer>,
    #[serde(rename = "QB")]
    pub qb: Vec<RosterPlayer>,
    #[serde(rename = "RB")]
    pub rb: Vec<RosterPlayer>,
    #[serde(rename = "TE")]
    pub te: Vec<RosterPlayer>,
    #[serde(rename = "WR")]
    pub wr: Vec<RosterPlayer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prizes {
    #[serde(rename = "ETH")]
    pub eth: f64,
}

/// A minted draft card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DraftToken {
    pub roster: Option<Roster>,
    #[serde(rename = "_draftType")]
    pub draft_type: String,
    #[serde(rename = "_cardId")]
    pub card_id: String,
    #[serde(rename = "_imageUrl")]
    pub image_url: String,
    #[serde(rename = "_level")]
    pub level: String,
    #[serde(rename = "_ownerId")]
    pub owner_id: String,
    #[serde(rename = "_leagueId")]
    pub league_id: String,
    #[serde(rename = "_leagueDisplayName")]
    pub league_display_name: String,
    #[serde(rename = "_rank")]
    pub rank: String,
    #[serde(rename = "_leagueRank")]
    pub league_rank: String,
    #[serde(rename = "_weekScore")]
    pub week_score: String,
    #[serde(rename = "_seasonScore")]
    pub season_score: String,
    pub prizes: Prizes,
}

impl DraftToken {
    /// A card without a drafted defense has not finished its draft
    pub fn is_drafted(&self) -> bool {
        self.roster.as_ref().is_some_and(|roster| !roster.dst.is_empty())
    }
}

/// Scoring state of one roster slot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreObject {
    pub player_id: String,
    /// Season total this slot had contributed before this week
    pub prev_week_season_contribution: f64,
    pub score_season: f64,
    pub score_week: f64,
    pub is_used_in_card_score: bool,
    pub team: String,
    /// Slot tag such as `RB1`, `RB2`, `TE`, `WR1`, `WR2`
    pub position: String,
}

/// Score-side roster mirroring [`Roster`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreRoster {
    #[serde(rename = "DST")]
    pub dst: Vec<ScoreObject>,
    #[serde(rename = "QB")]
    pub qb: Vec<ScoreObject>,
    #[serde(rename = "RB")]
    pub rb: Vec<ScoreObject>,
    #[serde(rename = "TE")]
    pub te: Vec<ScoreObject>,
    #[serde(rename = "WR")]
    pub wr: Vec<ScoreObject>,
}

impl ScoreRoster {
    pub fn group(&self, group: PositionGroup) -> &[ScoreObject] {
        match group {
            PositionGroup::Dst => &self.dst,
            PositionGroup::Qb => &self.qb,
            PositionGroup::Rb => &self.rb,
            PositionGroup::Te => &self.te,
            PositionGroup::Wr => &self.wr,
        }
    }

    pub fn group_mut(&mut self, group: PositionGroup) -> &mut Vec<ScoreObject> {
        match group {
            PositionGroup::Dst => &mut self.dst,
            PositionGroup::Qb => &mut self.qb,
            PositionGroup::Rb => &mut self.rb,
            PositionGroup::Te => &mut self.te,
            PositionGroup::Wr => &mut self.wr,
        }
    }
}

/// Persisted scoring record of one card for one week
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardScores {
    #[serde(rename = "_cardId")]
    pub card_id: String,
    pub roster: ScoreRoster,
    #[serde(rename = "scoreWeek")]
    pub score_week: f64,
    #[serde(rename = "scoreSeason")]
    pub score_season: f64,
    /// Card season total as of last week
    #[serde(rename = "prevWeekSeasonScore")]
    pub prev_week_season_score: f64,
}
