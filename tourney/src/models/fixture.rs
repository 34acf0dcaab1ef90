//! Fixture (match) models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tournament::{GroupLabel, TeamId, TournamentId};
use crate::errors::EngineError;

/// Fixture ID type (assigned by the repository; 0 until persisted)
pub type FixtureId = i64;

/// Fixture status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureStatus {
    /// Both teams known, not started
    Scheduled,
    /// Waiting for one or both teams from an earlier round
    Pending,
    /// At least one series game recorded
    InProgress,
    Completed,
    /// Decided without play
    Walkover,
    Postponed,
    Cancelled,
}

impl FixtureStatus {
    /// No further results can be recorded
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FixtureStatus::Completed | FixtureStatus::Walkover | FixtureStatus::Cancelled
        )
    }

    /// Results may be recorded in this state
    pub fn is_playable(self) -> bool {
        matches!(self, FixtureStatus::Scheduled | FixtureStatus::InProgress)
    }
}

/// Round a fixture belongs to
///
/// Serialized as its display string, e.g. `"round-of-16"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RoundTag {
    Group,
    /// Round with N teams remaining (N >= 16)
    RoundOf(u32),
    QuarterFinals,
    SemiFinals,
    Final,
    ThirdPlace,
}

impl RoundTag {
    /// Tag for bracket round `round` (1-indexed) out of `total_rounds`
    pub fn for_bracket_round(round: u32, total_rounds: u32) -> Self {
        match total_rounds.saturating_sub(round) {
            0 => RoundTag::Final,
            1 => RoundTag::SemiFinals,
            2 => RoundTag::QuarterFinals,
            remaining => RoundTag::RoundOf(1 << (remaining + 1)),
        }
    }
}

impl std::fmt::Display for RoundTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundTag::Group => write!(f, "group"),
            RoundTag::RoundOf(n) => write!(f, "round-of-{n}"),
            RoundTag::QuarterFinals => write!(f, "quarter-finals"),
            RoundTag::SemiFinals => write!(f, "semi-finals"),
            RoundTag::Final => write!(f, "final"),
            RoundTag::ThirdPlace => write!(f, "third-place"),
        }
    }
}

impl FromStr for RoundTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(RoundTag::Group),
            "quarter-finals" => Ok(RoundTag::QuarterFinals),
            "semi-finals" => Ok(RoundTag::SemiFinals),
            "final" => Ok(RoundTag::Final),
            "third-place" => Ok(RoundTag::ThirdPlace),
            other => other
                .strip_prefix("round-of-")
                .and_then(|n| n.parse().ok())
                .map(RoundTag::RoundOf)
                .ok_or_else(|| EngineError::InvalidSettings(format!("unknown round {other:?}"))),
        }
    }
}

impl TryFrom<String> for RoundTag {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoundTag> for String {
    fn from(tag: RoundTag) -> Self {
        tag.to_string()
    }
}

/// Position of a fixture in the elimination tree
///
/// `round` is 1-indexed, `index` is 0-indexed within the round. Fixture
/// `index` feeds fixture `index / 2` of the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BracketSlot {
    pub round: u32,
    pub index: u32,
}

impl BracketSlot {
    pub fn new(round: u32, index: u32) -> Self {
        Self { round, index }
    }

    /// Slot this fixture's winner moves into
    pub fn successor(self) -> Self {
        Self {
            round: self.round + 1,
            index: self.index / 2,
        }
    }
}

/// One side of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Points scored by each side in one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: u32,
    pub team2: u32,
}

impl SetScore {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }
}

/// Result of one game (or of a whole single match)
///
/// For set-based sports `score1`/`score2` are sets won and `sets` may carry
/// the per-set detail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameScore {
    pub score1: u32,
    pub score2: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<SetScore>,
}

impl GameScore {
    pub fn new(score1: u32, score2: u32) -> Self {
        Self {
            score1,
            score2,
            sets: Vec::new(),
        }
    }

    /// Build a set-based result from per-set detail; tallies are filled in by validation
    pub fn from_sets(sets: Vec<SetScore>) -> Self {
        Self {
            score1: 0,
            score2: 0,
            sets,
        }
    }

    /// Side with the higher score, `None` on a draw
    pub fn leader(&self) -> Option<Side> {
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(Side::Team1),
            std::cmp::Ordering::Less => Some(Side::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A match between two teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub tournament_id: TournamentId,
    pub group: Option<GroupLabel>,
    pub round: RoundTag,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    /// Goals, or sets won
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    #[serde(default)]
    pub sets: Vec<SetScore>,
    pub status: FixtureStatus,
    /// Group stage only
    pub matchday: Option<u32>,
    /// Elimination only
    pub slot: Option<BracketSlot>,
    pub next_slot: Option<BracketSlot>,
    /// Individual games of a best-of-N series, in play order
    #[serde(default)]
    pub series_games: Vec<GameScore>,
    /// Aggregate score across series games
    #[serde(default)]
    pub series_score: (u32, u32),
    /// Games won by each side
    #[serde(default)]
    pub series_wins: (u32, u32),
    pub series_winner: Option<TeamId>,
    pub winner: Option<TeamId>,
    /// Bumped by the repository on every successful update
    #[serde(default)]
    pub version: u64,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Fixture {
    fn blank(tournament_id: TournamentId, round: RoundTag) -> Self {
        Self {
            id: 0,
            tournament_id,
            group: None,
            round,
            team1: None,
            team2: None,
            score1: None,
            score2: None,
            sets: Vec::new(),
            status: FixtureStatus::Pending,
            matchday: None,
            slot: None,
            next_slot: None,
            series_games: Vec::new(),
            series_score: (0, 0),
            series_wins: (0, 0),
            series_winner: None,
            winner: None,
            version: 0,
            completed_at: None,
        }
    }

    /// Create a scheduled group-stage fixture
    pub fn group_match(
        tournament_id: TournamentId,
        group: GroupLabel,
        team1: TeamId,
        team2: TeamId,
        matchday: u32,
    ) -> Self {
        Self {
            group: Some(group),
            team1: Some(team1),
            team2: Some(team2),
            status: FixtureStatus::Scheduled,
            matchday: Some(matchday),
            ..Self::blank(tournament_id, RoundTag::Group)
        }
    }

    /// Create an empty bracket fixture
    pub fn bracket_match(
        tournament_id: TournamentId,
        round: RoundTag,
        slot: Option<BracketSlot>,
        next_slot: Option<BracketSlot>,
    ) -> Self {
        Self {
            slot,
            next_slot,
            ..Self::blank(tournament_id, round)
        }
    }

    pub fn team(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }

    /// Side `team_id` plays on, if any
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if self.team1 == Some(team_id) {
            Some(Side::Team1)
        } else if self.team2 == Some(team_id) {
            Some(Side::Team2)
        } else {
            None
        }
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.side_of(team_id).is_some()
    }

    /// Part of an elimination bracket, including the third-place match
    pub fn is_bracket(&self) -> bool {
        self.slot.is_some() || self.round == RoundTag::ThirdPlace
    }

    pub fn has_both_teams(&self) -> bool {
        self.team1.is_some() && self.team2.is_some()
    }

    /// Team that lost a decided fixture with two participants
    pub fn loser(&self) -> Option<TeamId> {
        let winner = self.winner?;
        match self.side_of(winner)? {
            Side::Team1 => self.team2,
            Side::Team2 => self.team1,
        }
    }

    /// Mark completed; `winner` is `None` for a drawn group fixture
    pub(crate) fn complete(&mut self, winner: Option<TeamId>) {
        self.status = FixtureStatus::Completed;
        self.winner = winner;
        self.completed_at = Some(Utc::now());
    }

    /// Mark decided without play
    pub(crate) fn award_walkover(&mut self, winner: TeamId) {
        self.status = FixtureStatus::Walkover;
        self.winner = Some(winner);
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tags() {
        assert_eq!(RoundTag::for_bracket_round(3, 3), RoundTag::Final);
        assert_eq!(RoundTag::for_bracket_round(2, 3), RoundTag::SemiFinals);
        assert_eq!(RoundTag::for_bracket_round(1, 3), RoundTag::QuarterFinals);
        assert_eq!(RoundTag::for_bracket_round(1, 4), RoundTag::RoundOf(16));
        assert_eq!(RoundTag::for_bracket_round(1, 5), RoundTag::RoundOf(32));
        assert_eq!(RoundTag::RoundOf(16).to_string(), "round-of-16");
        assert_eq!(RoundTag::ThirdPlace.to_string(), "third-place");
    }

    #[test]
    fn test_successor_slot() {
        assert_eq!(BracketSlot::new(1, 0).successor(), BracketSlot::new(2, 0));
        assert_eq!(BracketSlot::new(1, 1).successor(), BracketSlot::new(2, 0));
        assert_eq!(BracketSlot::new(1, 5).successor(), BracketSlot::new(2, 2));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(FixtureStatus::Completed.is_terminal());
        assert!(FixtureStatus::Walkover.is_terminal());
        assert!(FixtureStatus::Cancelled.is_terminal());
        assert!(!FixtureStatus::Postponed.is_terminal());
        assert!(FixtureStatus::InProgress.is_playable());
        assert!(!FixtureStatus::Pending.is_playable());
    }

    #[test]
    fn test_loser_and_sides() {
        let mut fixture = Fixture::group_match(1, 'A', 10, 20, 1);
        assert_eq!(fixture.side_of(20), Some(Side::Team2));
        assert_eq!(fixture.loser(), None);

        fixture.complete(Some(20));
        assert_eq!(fixture.loser(), Some(10));
        assert!(fixture.completed_at.is_some());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&FixtureStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_round_tag_wire_format() {
        let json = serde_json::to_string(&RoundTag::RoundOf(16)).unwrap();
        assert_eq!(json, "\"round-of-16\"");
        let tag: RoundTag = serde_json::from_str("\"round-of-16\"").unwrap();
        assert_eq!(tag, RoundTag::RoundOf(16));

        let json = serde_json::to_string(&RoundTag::ThirdPlace).unwrap();
        assert_eq!(json, "\"third-place\"");
        assert_eq!("semi-finals".parse::<RoundTag>().unwrap(), RoundTag::SemiFinals);

        assert!(serde_json::from_str::<RoundTag>("\"round-of-many\"").is_err());
        assert!(serde_json::from_str::<RoundTag>("{\"round-of\":16}").is_err());
        assert!("quarterfinals".parse::<RoundTag>().is_err());
    }
}
