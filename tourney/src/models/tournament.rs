//! Tournament, team and group models.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::rules::{GoalBased, SetBased, SportRules};

/// Tournament ID type
pub type TournamentId = i64;

/// Team ID type
pub type TeamId = i64;

/// Group label (`A`..`H`)
pub type GroupLabel = char;

/// A competing team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Sport played in a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sport {
    Soccer,
    Futsal,
    Basketball,
    Volleyball,
}

impl Sport {
    /// Rule variant used when a tournament carries no custom rules
    pub fn default_rules(self) -> SportRules {
        match self {
            Sport::Soccer | Sport::Futsal | Sport::Basketball => GoalBased::default().into(),
            Sport::Volleyball => SetBased::default().into(),
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sport::Soccer => write!(f, "soccer"),
            Sport::Futsal => write!(f, "futsal"),
            Sport::Basketball => write!(f, "basketball"),
            Sport::Volleyball => write!(f, "volleyball"),
        }
    }
}

/// Competitive structure of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Round-robin groups followed by a playoff bracket
    GroupStage,
    /// Single-elimination bracket from the start
    Elimination,
}

/// Round-robin legs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Legs {
    /// Every pair meets once
    Single,
    /// Every pair meets twice, home and away
    Double,
}

/// Group stage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStageSettings {
    /// Target number of teams per group
    pub teams_per_group: usize,
    /// Teams advancing from each group to the playoff bracket
    pub teams_advancing_per_group: usize,
    /// Times each pair meets (1 = single, 2 = double round-robin)
    pub matches_per_team_in_group: u8,
}

impl Default for GroupStageSettings {
    fn default() -> Self {
        Self {
            teams_per_group: 4,
            teams_advancing_per_group: 2,
            matches_per_team_in_group: 1,
        }
    }
}

impl GroupStageSettings {
    /// Round-robin legs implied by `matches_per_team_in_group`
    pub fn legs(&self) -> EngineResult<Legs> {
        match self.matches_per_team_in_group {
            1 => Ok(Legs::Single),
            2 => Ok(Legs::Double),
            other => Err(EngineError::InvalidSettings(format!(
                "matches per team in group must be 1 or 2, got {other}"
            ))),
        }
    }
}

/// Tournament definition as supplied by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub sport: Sport,
    pub format: Format,
    /// Overrides the sport's default rules
    #[serde(default)]
    pub custom_rules: Option<SportRules>,
    #[serde(default)]
    pub group_stage: GroupStageSettings,
    /// Games per bracket series (1 = single match)
    #[serde(default = "default_best_of")]
    pub best_of: u32,
    /// Play a third-place match between the semi-final losers
    #[serde(default)]
    pub third_place_match: bool,
    /// Registered teams
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
}

fn default_best_of() -> u32 {
    1
}

impl Tournament {
    /// Create a tournament with default settings
    pub fn new(id: TournamentId, name: impl Into<String>, sport: Sport, format: Format) -> Self {
        Self {
            id,
            name: name.into(),
            sport,
            format,
            custom_rules: None,
            group_stage: GroupStageSettings::default(),
            best_of: default_best_of(),
            third_place_match: false,
            team_ids: Vec::new(),
        }
    }

    pub fn with_teams(mut self, team_ids: Vec<TeamId>) -> Self {
        self.team_ids = team_ids;
        self
    }

    pub fn with_rules(mut self, rules: SportRules) -> Self {
        self.custom_rules = Some(rules);
        self
    }

    pub fn with_group_stage(mut self, settings: GroupStageSettings) -> Self {
        self.group_stage = settings;
        self
    }

    pub fn with_best_of(mut self, best_of: u32) -> Self {
        self.best_of = best_of;
        self
    }

    pub fn with_third_place_match(mut self) -> Self {
        self.third_place_match = true;
        self
    }

    /// Rules in force for this tournament
    pub fn rules(&self) -> SportRules {
        self.custom_rules
            .clone()
            .unwrap_or_else(|| self.sport.default_rules())
    }

    /// Check that the tournament has the expected format
    pub fn require_format(&self, expected: Format) -> EngineResult<()> {
        if self.format != expected {
            return Err(EngineError::WrongFormat {
                expected,
                actual: self.format,
            });
        }
        Ok(())
    }
}

/// A named round-robin group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: GroupLabel,
    pub team_ids: Vec<TeamId>,
}

impl Group {
    pub fn new(label: GroupLabel) -> Self {
        Self {
            label,
            team_ids: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.team_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.team_ids.is_empty()
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.team_ids.contains(&team_id)
    }
}

/// Final position of a team in the bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// 1-indexed; semi-final losers share 3rd without a third-place match
    pub position: u32,
    pub team_id: TeamId,
}
