//! Result recording and best-of-N series progression.
//!
//! Fixture-level functions validate and apply one result. The
//! [`Bracket`] methods wrap them and move the winner on through the tree.

use serde::{Deserialize, Serialize};

use super::Bracket;
use crate::draw::DrawSource;
use crate::errors::{EngineError, EngineResult};
use crate::models::{Fixture, FixtureId, FixtureStatus, GameScore, RoundTag, Side, TeamId};
use crate::rules::{ScoringRules, SportRules};

/// Outcome of recording a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum SeriesProgress {
    /// Series continues; game wins so far
    InProgress { wins: (u32, u32) },
    /// Fixture decided; `None` for a drawn group fixture
    Completed { winner: Option<TeamId> },
}

impl SeriesProgress {
    pub fn is_complete(&self) -> bool {
        matches!(self, SeriesProgress::Completed { .. })
    }
}

fn ensure_playable(fixture: &Fixture) -> EngineResult<()> {
    if !fixture.status.is_playable() || !fixture.has_both_teams() {
        return Err(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        });
    }
    Ok(())
}

fn decided_by(fixture: &Fixture, side: Side) -> EngineResult<TeamId> {
    fixture
        .team(side)
        .ok_or(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        })
}

/// Record one game of a bracket series
///
/// The series completes once a side reaches `best_of / 2 + 1` game wins, or
/// after `best_of` games on aggregate score. An exact aggregate tie at that
/// point is settled by a coin flip from `draw`.
///
/// # Errors
///
/// * `InvalidFixtureState` if the fixture is not playable or a seat is empty
/// * `InvalidSettings` if `best_of` is zero
/// * validation errors from the sport rules
pub fn record_game(
    fixture: &mut Fixture,
    game: &GameScore,
    best_of: u32,
    rules: &SportRules,
    draw: &mut dyn DrawSource,
) -> EngineResult<SeriesProgress> {
    ensure_playable(fixture)?;
    if best_of == 0 {
        return Err(EngineError::InvalidSettings(
            "best-of must be at least 1".to_string(),
        ));
    }

    let game = rules.validate_result(game)?;
    if game.leader().is_none() && !rules.allows_draws() {
        return Err(EngineError::DrawNotAllowed);
    }

    fixture.series_score.0 += game.score1;
    fixture.series_score.1 += game.score2;
    match game.leader() {
        Some(Side::Team1) => fixture.series_wins.0 += 1,
        Some(Side::Team2) => fixture.series_wins.1 += 1,
        None => {}
    }
    fixture.series_games.push(game);
    fixture.status = FixtureStatus::InProgress;

    let required = best_of / 2 + 1;
    let (wins1, wins2) = fixture.series_wins;
    let decided = if wins1 >= required {
        Some(Side::Team1)
    } else if wins2 >= required {
        Some(Side::Team2)
    } else if fixture.series_games.len() as u32 >= best_of {
        let (aggregate1, aggregate2) = fixture.series_score;
        Some(match aggregate1.cmp(&aggregate2) {
            std::cmp::Ordering::Greater => Side::Team1,
            std::cmp::Ordering::Less => Side::Team2,
            std::cmp::Ordering::Equal => {
                let side = draw.coin_flip();
                log::warn!(
                    "Fixture {} level on aggregate {}-{} after {} games, coin flip picks {:?}",
                    fixture.id,
                    aggregate1,
                    aggregate2,
                    best_of,
                    side
                );
                side
            }
        })
    } else {
        None
    };

    let Some(side) = decided else {
        log::debug!(
            "Fixture {} series at {}-{} in games",
            fixture.id,
            wins1,
            wins2
        );
        return Ok(SeriesProgress::InProgress {
            wins: (wins1, wins2),
        });
    };

    let winner = decided_by(fixture, side)?;
    if best_of == 1 {
        let only = &fixture.series_games[0];
        fixture.score1 = Some(only.score1);
        fixture.score2 = Some(only.score2);
        fixture.sets = only.sets.clone();
    } else {
        fixture.score1 = Some(wins1);
        fixture.score2 = Some(wins2);
    }
    fixture.series_winner = Some(winner);
    fixture.complete(Some(winner));

    log::debug!("Fixture {} won by team {}", fixture.id, winner);
    Ok(SeriesProgress::Completed {
        winner: Some(winner),
    })
}

/// Record a whole-match result
///
/// Group fixtures may end level when the rules allow it. A bracket fixture
/// is decided by this single result, so it must have a winner.
///
/// # Errors
///
/// * `InvalidFixtureState` if the fixture is not playable, a seat is empty,
///   or a series is already under way
/// * `DrawNotAllowed` for a level result the fixture cannot accept
/// * validation errors from the sport rules
pub fn record_match(
    fixture: &mut Fixture,
    result: &GameScore,
    rules: &SportRules,
) -> EngineResult<SeriesProgress> {
    ensure_playable(fixture)?;
    if !fixture.series_games.is_empty() {
        return Err(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        });
    }

    let result = rules.validate_result(result)?;
    let is_group = fixture.group.is_some();
    let leader = result.leader();
    if leader.is_none() && !(is_group && rules.allows_draws()) {
        return Err(EngineError::DrawNotAllowed);
    }

    let winner = match leader {
        Some(side) => Some(decided_by(fixture, side)?),
        None => None,
    };

    fixture.score1 = Some(result.score1);
    fixture.score2 = Some(result.score2);
    fixture.sets = result.sets.clone();
    if !is_group {
        fixture.series_score = (result.score1, result.score2);
        fixture.series_wins = match leader {
            Some(Side::Team1) => (1, 0),
            _ => (0, 1),
        };
        fixture.series_games = vec![result];
        fixture.series_winner = winner;
    }
    fixture.complete(winner);

    log::debug!(
        "Fixture {} completed {}-{}",
        fixture.id,
        fixture.score1.unwrap_or_default(),
        fixture.score2.unwrap_or_default()
    );
    Ok(SeriesProgress::Completed { winner })
}

/// Award a fixture to `winner` without play
///
/// # Errors
///
/// * `InvalidFixtureState` if the fixture is already decided or cancelled
/// * `NotAParticipant` if `winner` is not seated in the fixture
pub fn record_walkover(fixture: &mut Fixture, winner: TeamId) -> EngineResult<()> {
    if fixture.status.is_terminal() {
        return Err(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        });
    }
    if !fixture.involves(winner) {
        return Err(EngineError::NotAParticipant {
            fixture: fixture.id,
            team: winner,
        });
    }

    if fixture.group.is_none() {
        fixture.series_winner = Some(winner);
    }
    fixture.award_walkover(winner);
    log::info!("Fixture {} awarded to team {} by walkover", fixture.id, winner);
    Ok(())
}

/// Administrative status change
///
/// * `Postponed` from `Scheduled`, `Pending` or `InProgress`
/// * `Scheduled` from `Postponed`; the fixture returns to `Pending` while a
///   seat is empty and to `InProgress` when series games exist
/// * `Cancelled` from any non-terminal status
///
/// # Errors
///
/// `InvalidFixtureState` for any other transition.
pub fn set_status(fixture: &mut Fixture, status: FixtureStatus) -> EngineResult<()> {
    use FixtureStatus::*;

    let allowed = match (fixture.status, status) {
        (Scheduled | Pending | InProgress, Postponed) => true,
        (Postponed, Scheduled) => true,
        (from, Cancelled) => !from.is_terminal(),
        _ => false,
    };
    if !allowed {
        return Err(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        });
    }

    let previous = fixture.status;
    fixture.status = match status {
        Scheduled if !fixture.has_both_teams() => Pending,
        Scheduled if !fixture.series_games.is_empty() => InProgress,
        other => other,
    };

    log::info!(
        "Fixture {} moved from {:?} to {:?}",
        fixture.id,
        previous,
        fixture.status
    );
    Ok(())
}

impl Bracket {
    fn fixture_by_id(&mut self, fixture_id: FixtureId) -> EngineResult<&mut Fixture> {
        self.find_mut(fixture_id)
            .ok_or(EngineError::FixtureNotFound(fixture_id))
    }

    fn after_decision(&mut self, fixture_id: FixtureId) -> EngineResult<()> {
        let slot = self.find(fixture_id).and_then(|f| f.slot);
        match slot {
            Some(slot) => self.advance(slot),
            // third-place match
            None => Ok(()),
        }
    }

    /// Record a series game and advance the winner once decided
    pub fn apply_game(
        &mut self,
        fixture_id: FixtureId,
        game: &GameScore,
        best_of: u32,
        rules: &SportRules,
        draw: &mut dyn DrawSource,
    ) -> EngineResult<SeriesProgress> {
        let fixture = self.fixture_by_id(fixture_id)?;
        let progress = record_game(fixture, game, best_of, rules, draw)?;
        if progress.is_complete() {
            self.after_decision(fixture_id)?;
        }
        Ok(progress)
    }

    /// Record a whole-match result and advance the winner
    pub fn apply_match(
        &mut self,
        fixture_id: FixtureId,
        result: &GameScore,
        rules: &SportRules,
    ) -> EngineResult<SeriesProgress> {
        let fixture = self.fixture_by_id(fixture_id)?;
        let progress = record_match(fixture, result, rules)?;
        self.after_decision(fixture_id)?;
        Ok(progress)
    }

    /// Fixtures whose results seat teams into `fixture`
    ///
    /// The third-place match is fed by every semi-final.
    fn feeders_of(&self, fixture: &Fixture) -> Vec<&Fixture> {
        match fixture.slot {
            Some(slot) if slot.round > 1 => self
                .rounds
                .get(slot.round as usize - 2)
                .into_iter()
                .flatten()
                .skip(2 * slot.index as usize)
                .take(self.feeder_count(slot))
                .collect(),
            Some(_) => Vec::new(),
            None if fixture.round == RoundTag::ThirdPlace && self.rounds.len() >= 2 => {
                self.rounds[self.rounds.len() - 2].iter().collect()
            }
            None => Vec::new(),
        }
    }

    /// Award a walkover and advance the winner
    ///
    /// # Errors
    ///
    /// `InvalidFixtureState` while a feeder of the fixture is undecided, since
    /// its winner still needs the seat.
    pub fn apply_walkover(&mut self, fixture_id: FixtureId, winner: TeamId) -> EngineResult<()> {
        let fixture = self.find(fixture_id).ok_or(EngineError::FixtureNotFound(fixture_id))?;
        if self.feeders_of(fixture).iter().any(|f| f.winner.is_none()) {
            return Err(EngineError::InvalidFixtureState {
                fixture: fixture_id,
                status: fixture.status,
            });
        }
        let fixture = self.fixture_by_id(fixture_id)?;
        record_walkover(fixture, winner)?;
        self.after_decision(fixture_id)
    }
}
