//! Set-based scoring (volleyball).

use serde::{Deserialize, Serialize};

use super::ScoringRules;
use crate::errors::{EngineError, EngineResult};
use crate::models::{GameScore, SetScore};

/// Table points when a match is won in straight or four sets
const DECISIVE_AWARD: (u32, u32) = (3, 0);

/// Table points when a match goes to the deciding set
const TIEBREAK_AWARD: (u32, u32) = (2, 1);

/// Table points when `scoring_by_margin` is off
const FLAT_AWARD: (u32, u32) = (2, 0);

/// Set rules and award tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBased {
    /// Points needed to win a regular set
    pub regular_set_points: u32,
    /// Points needed to win the deciding set
    pub last_set_points: u32,
    /// Minimum winning margin within a set
    pub min_difference: u32,
    /// Sets needed to win the match
    pub sets_to_win: u32,
    /// Award fewer points for matches decided in the last set
    pub scoring_by_margin: bool,
}

impl Default for SetBased {
    fn default() -> Self {
        Self {
            regular_set_points: 25,
            last_set_points: 15,
            min_difference: 2,
            sets_to_win: 3,
            scoring_by_margin: true,
        }
    }
}

impl SetBased {
    /// Maximum number of sets in a match
    pub fn max_sets(&self) -> u32 {
        (self.sets_to_win * 2).saturating_sub(1)
    }

    /// Points needed to win set `number` (1-indexed)
    pub fn threshold(&self, number: usize) -> u32 {
        if number as u32 == self.max_sets() {
            self.last_set_points
        } else {
            self.regular_set_points
        }
    }

    /// Validate one set
    pub fn validate_set(&self, number: usize, set: &SetScore) -> EngineResult<()> {
        let invalid = |reason: String| EngineError::InvalidSet {
            set: number,
            reason,
        };

        if set.team1 == set.team2 {
            return Err(invalid(format!("tied at {}-{}", set.team1, set.team2)));
        }

        let (won, lost) = (set.team1.max(set.team2), set.team1.min(set.team2));
        let threshold = self.threshold(number);
        let min_difference = self.min_difference.max(1);

        if won < threshold {
            return Err(invalid(format!(
                "winner has {won} points, needs {threshold}"
            )));
        }
        if won - lost < min_difference {
            return Err(invalid(format!(
                "margin {} is below the minimum {min_difference}",
                won - lost
            )));
        }
        // Play stops as soon as the margin is reached past the threshold
        if won > threshold && won - lost != min_difference {
            return Err(invalid(format!(
                "set extended past {threshold} must end with a {min_difference}-point margin"
            )));
        }

        Ok(())
    }

    /// Validate a full sequence of sets and return the sets won by each side
    pub fn validate_sets(&self, sets: &[SetScore]) -> EngineResult<(u32, u32)> {
        self.check_config()?;

        let mut tally = (0, 0);
        for (i, set) in sets.iter().enumerate() {
            let number = i + 1;
            if tally.0 == self.sets_to_win || tally.1 == self.sets_to_win {
                return Err(EngineError::InvalidSet {
                    set: number,
                    reason: "match was already decided".to_string(),
                });
            }
            self.validate_set(number, set)?;
            if set.team1 > set.team2 {
                tally.0 += 1;
            } else {
                tally.1 += 1;
            }
        }

        self.validate_tally(tally.0, tally.1)?;
        Ok(tally)
    }

    /// Validate a final set tally
    ///
    /// The winner must have exactly `sets_to_win` and the loser strictly fewer.
    pub fn validate_tally(&self, sets1: u32, sets2: u32) -> EngineResult<()> {
        self.check_config()?;

        if sets1 >= self.sets_to_win && sets2 >= self.sets_to_win {
            return Err(EngineError::InvalidScore(format!(
                "both sides reached {} sets ({sets1}-{sets2})",
                self.sets_to_win
            )));
        }
        if sets1.max(sets2) != self.sets_to_win {
            return Err(EngineError::InvalidScore(format!(
                "match must end when a side wins {} sets, got {sets1}-{sets2}",
                self.sets_to_win
            )));
        }
        Ok(())
    }

    fn check_config(&self) -> EngineResult<()> {
        if self.sets_to_win == 0 || self.regular_set_points == 0 || self.last_set_points == 0 {
            return Err(EngineError::InvalidSettings(
                "set rules need positive sets to win and set points".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the loser took the match to the deciding set
    fn is_tiebreak(&self, loser_sets: u32) -> bool {
        self.sets_to_win > 1 && loser_sets == self.sets_to_win - 1
    }
}

impl ScoringRules for SetBased {
    fn allows_draws(&self) -> bool {
        false
    }

    fn validate_result(&self, score: &GameScore) -> EngineResult<GameScore> {
        if score.sets.is_empty() {
            self.validate_tally(score.score1, score.score2)?;
            return Ok(score.clone());
        }

        let tally = self.validate_sets(&score.sets)?;
        let recorded = (score.score1, score.score2);
        if recorded != (0, 0) && recorded != tally {
            return Err(EngineError::SetTotalsMismatch {
                detail: tally,
                recorded,
            });
        }

        Ok(GameScore {
            score1: tally.0,
            score2: tally.1,
            sets: score.sets.clone(),
        })
    }

    fn award_points(&self, score1: u32, score2: u32) -> (u32, u32) {
        let team1_won = score1 > score2;
        let loser_sets = score1.min(score2);

        let (winner_points, loser_points) = if !self.scoring_by_margin {
            FLAT_AWARD
        } else if self.is_tiebreak(loser_sets) {
            TIEBREAK_AWARD
        } else {
            DECISIVE_AWARD
        };

        if team1_won {
            (winner_points, loser_points)
        } else {
            (loser_points, winner_points)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(scores: &[(u32, u32)]) -> Vec<SetScore> {
        scores.iter().map(|&(a, b)| SetScore::new(a, b)).collect()
    }

    #[test]
    fn test_margin_of_one_rejected() {
        let rules = SetBased::default();
        let err = rules.validate_set(1, &SetScore::new(25, 24)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSet { set: 1, .. }));
    }

    #[test]
    fn test_regular_set_accepted() {
        let rules = SetBased::default();
        assert!(rules.validate_set(1, &SetScore::new(25, 20)).is_ok());
        assert!(rules.validate_set(2, &SetScore::new(18, 25)).is_ok());
    }

    #[test]
    fn test_extended_set() {
        let rules = SetBased::default();
        assert!(rules.validate_set(1, &SetScore::new(27, 25)).is_ok());
        assert!(rules.validate_set(1, &SetScore::new(30, 20)).is_err());
    }

    #[test]
    fn test_tied_set_rejected() {
        let rules = SetBased::default();
        assert!(rules.validate_set(3, &SetScore::new(25, 25)).is_err());
    }

    #[test]
    fn test_short_set_rejected() {
        let rules = SetBased::default();
        assert!(rules.validate_set(1, &SetScore::new(20, 15)).is_err());
    }

    #[test]
    fn test_deciding_set_threshold() {
        let rules = SetBased::default();
        assert!(rules.validate_set(5, &SetScore::new(15, 10)).is_ok());
        assert!(rules.validate_set(4, &SetScore::new(15, 10)).is_err());
        assert_eq!(rules.threshold(5), 15);
        assert_eq!(rules.threshold(4), 25);
    }

    #[test]
    fn test_five_set_match() {
        let rules = SetBased::default();
        let tally = rules
            .validate_sets(&sets(&[(25, 20), (20, 25), (25, 23), (22, 25), (15, 10)]))
            .unwrap();
        assert_eq!(tally, (3, 2));
    }

    #[test]
    fn test_set_after_decision_rejected() {
        let rules = SetBased::default();
        let err = rules
            .validate_sets(&sets(&[(25, 20), (25, 20), (25, 20), (20, 25)]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSet { set: 4, .. }));
    }

    #[test]
    fn test_unfinished_match_rejected() {
        let rules = SetBased::default();
        assert!(rules.validate_sets(&sets(&[(25, 20), (25, 20)])).is_err());
    }

    #[test]
    fn test_tally_validation() {
        let rules = SetBased::default();
        assert!(rules.validate_tally(3, 2).is_ok());
        assert!(rules.validate_tally(0, 3).is_ok());
        assert!(rules.validate_tally(3, 3).is_err());
        assert!(rules.validate_tally(2, 1).is_err());
        assert!(rules.validate_tally(4, 1).is_err());
    }

    #[test]
    fn test_result_with_mismatched_totals() {
        let rules = SetBased::default();
        let score = GameScore {
            score1: 3,
            score2: 1,
            sets: sets(&[(25, 20), (25, 20), (25, 20)]),
        };
        assert!(matches!(
            rules.validate_result(&score),
            Err(EngineError::SetTotalsMismatch { .. })
        ));
    }

    #[test]
    fn test_result_fills_tally_from_sets() {
        let rules = SetBased::default();
        let score = GameScore::from_sets(sets(&[(20, 25), (25, 27), (16, 25)]));
        let validated = rules.validate_result(&score).unwrap();
        assert_eq!((validated.score1, validated.score2), (0, 3));
    }

    #[test]
    fn test_award_tables() {
        let rules = SetBased::default();
        assert_eq!(rules.award_points(3, 0), (3, 0));
        assert_eq!(rules.award_points(1, 3), (0, 3));
        assert_eq!(rules.award_points(3, 2), (2, 1));
        assert_eq!(rules.award_points(2, 3), (1, 2));

        let flat = SetBased {
            scoring_by_margin: false,
            ..SetBased::default()
        };
        assert_eq!(flat.award_points(3, 2), (2, 0));
    }

    #[test]
    fn test_best_of_three_sets() {
        let rules = SetBased {
            sets_to_win: 2,
            ..SetBased::default()
        };
        assert_eq!(rules.max_sets(), 3);
        let tally = rules
            .validate_sets(&sets(&[(25, 22), (21, 25), (15, 13)]))
            .unwrap();
        assert_eq!(tally, (2, 1));
        assert_eq!(rules.award_points(2, 1), (2, 1));
    }
}
