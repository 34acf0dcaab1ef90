//! Goal-based scoring (soccer, futsal, basketball).

use serde::{Deserialize, Serialize};

use super::ScoringRules;
use crate::errors::{EngineError, EngineResult};
use crate::models::GameScore;

/// Win/draw/loss point table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalBased {
    pub points_win: u32,
    pub points_draw: u32,
    pub points_loss: u32,
}

impl Default for GoalBased {
    fn default() -> Self {
        Self {
            points_win: 3,
            points_draw: 1,
            points_loss: 0,
        }
    }
}

impl ScoringRules for GoalBased {
    fn allows_draws(&self) -> bool {
        true
    }

    fn validate_result(&self, score: &GameScore) -> EngineResult<GameScore> {
        if !score.sets.is_empty() {
            return Err(EngineError::InvalidScore(
                "set detail only applies to set-based sports".to_string(),
            ));
        }
        Ok(score.clone())
    }

    fn award_points(&self, score1: u32, score2: u32) -> (u32, u32) {
        match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => (self.points_win, self.points_loss),
            std::cmp::Ordering::Less => (self.points_loss, self.points_win),
            std::cmp::Ordering::Equal => (self.points_draw, self.points_draw),
        }
    }
}
