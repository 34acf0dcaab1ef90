//! Sport-specific scoring rules.
//!
//! Every tournament resolves one [`SportRules`] variant when it is configured
//! (see [`Tournament::rules`](crate::models::Tournament::rules)); the rest of the
//! engine talks to it through the [`ScoringRules`] trait:
//!
//! - [`GoalBased`]: soccer, futsal, basketball. Draws allowed, configurable
//!   win/draw/loss points.
//! - [`SetBased`]: volleyball. No draws, separate award tables for decisive
//!   and tie-break wins, per-set validation.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;
use crate::models::GameScore;

pub mod goal;
pub mod set;

pub use goal::GoalBased;
pub use set::SetBased;

/// Scoring behaviour shared by all rule variants
#[enum_dispatch]
pub trait ScoringRules {
    /// Whether a fixture may end level
    fn allows_draws(&self) -> bool;

    /// Validate a result, returning it with normalised tallies
    fn validate_result(&self, score: &GameScore) -> EngineResult<GameScore>;

    /// Table points for (team1, team2) given a validated result
    fn award_points(&self, score1: u32, score2: u32) -> (u32, u32);
}

/// Rule configuration, tagged by sport family
#[enum_dispatch(ScoringRules)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SportRules {
    GoalBased(GoalBased),
    SetBased(SetBased),
}
