//! Single-elimination brackets.
//!
//! A bracket is held as dense per-round arrays addressed by
//! [`BracketSlot`]`{ round, index }`. Fixture `index` of round `r` feeds
//! fixture `index / 2` of round `r + 1`; when a round has an odd number of
//! fixtures, the last fixture of the next round has a single feeder and
//! passes its only team straight through as a walkover.
//!
//! - [`builder`]: shuffle entrants and lay out the tree, resolving byes
//! - [`series`]: best-of-N progression and winner advancement
//! - [`view`]: read-only bracket view and final placements

use crate::errors::{EngineError, EngineResult};
use crate::models::{BracketSlot, Fixture, FixtureId, FixtureStatus, RoundTag, TeamId};

pub mod builder;
pub mod series;
pub mod view;

pub use builder::build_bracket;
pub use series::{SeriesProgress, record_game, record_match, record_walkover, set_status};
pub use view::{BracketView, RoundView, final_placements};

/// Elimination tree plus the optional third-place match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    rounds: Vec<Vec<Fixture>>,
    third_place: Option<Fixture>,
}

impl Bracket {
    pub(crate) fn new(rounds: Vec<Vec<Fixture>>, third_place: Option<Fixture>) -> Self {
        Self {
            rounds,
            third_place,
        }
    }

    /// Rebuild a bracket from stored fixtures
    ///
    /// Group fixtures are ignored. Returns `None` when no bracket fixture exists.
    pub fn from_fixtures(fixtures: impl IntoIterator<Item = Fixture>) -> Option<Self> {
        let mut slotted = Vec::new();
        let mut third_place = None;

        for fixture in fixtures {
            if fixture.round == RoundTag::ThirdPlace {
                third_place = Some(fixture);
            } else if fixture.slot.is_some() {
                slotted.push(fixture);
            }
        }

        if slotted.is_empty() {
            return None;
        }
        slotted.sort_by_key(|f| f.slot);

        let mut rounds: Vec<Vec<Fixture>> = Vec::new();
        for fixture in slotted {
            let round = fixture.slot.map(|s| s.round as usize).unwrap_or(1).max(1);
            while rounds.len() < round {
                rounds.push(Vec::new());
            }
            rounds[round - 1].push(fixture);
        }

        Some(Self::new(rounds, third_place))
    }

    pub fn rounds(&self) -> &[Vec<Fixture>] {
        &self.rounds
    }

    pub fn third_place(&self) -> Option<&Fixture> {
        self.third_place.as_ref()
    }

    pub fn total_rounds(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn fixture(&self, slot: BracketSlot) -> Option<&Fixture> {
        self.rounds
            .get((slot.round as usize).checked_sub(1)?)?
            .get(slot.index as usize)
    }

    fn fixture_mut(&mut self, slot: BracketSlot) -> EngineResult<&mut Fixture> {
        (slot.round as usize)
            .checked_sub(1)
            .and_then(|r| self.rounds.get_mut(r))
            .and_then(|round| round.get_mut(slot.index as usize))
            .ok_or_else(|| {
                EngineError::Persistence(format!(
                    "bracket slot {}:{} is missing",
                    slot.round, slot.index
                ))
            })
    }

    /// Find a fixture by id, including the third-place match
    pub fn find(&self, fixture_id: FixtureId) -> Option<&Fixture> {
        self.fixtures().find(|f| f.id == fixture_id)
    }

    pub(crate) fn find_mut(&mut self, fixture_id: FixtureId) -> Option<&mut Fixture> {
        self.rounds
            .iter_mut()
            .flatten()
            .chain(self.third_place.iter_mut())
            .find(|f| f.id == fixture_id)
    }

    /// Winner of the final, once decided
    pub fn champion(&self) -> Option<TeamId> {
        self.rounds.last()?.first()?.winner
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.rounds.iter().flatten().chain(self.third_place.iter())
    }

    pub fn into_fixtures(self) -> Vec<Fixture> {
        self.rounds
            .into_iter()
            .flatten()
            .chain(self.third_place)
            .collect()
    }

    /// Number of earlier fixtures feeding `slot` (0 in the first round)
    pub(crate) fn feeder_count(&self, slot: BracketSlot) -> usize {
        if slot.round <= 1 {
            return 0;
        }
        let previous = self
            .rounds
            .get(slot.round as usize - 2)
            .map_or(0, Vec::len);
        previous.saturating_sub(2 * slot.index as usize).min(2)
    }

    /// Move the winner of the decided fixture at `from` into its successor
    ///
    /// Semi-final losers are seated into the third-place match. A successor
    /// with a single feeder is resolved as a walkover and advanced further.
    pub(crate) fn advance(&mut self, from: BracketSlot) -> EngineResult<()> {
        let fixture = self.fixture_mut(from)?;
        let winner = fixture.winner.ok_or(EngineError::InvalidFixtureState {
            fixture: fixture.id,
            status: fixture.status,
        })?;
        let loser = fixture.loser();
        let next = fixture.next_slot;

        let total = self.total_rounds();
        if total >= 2 && from.round == total - 1 {
            if let (Some(loser), Some(third)) = (loser, self.third_place.as_mut()) {
                if !third.status.is_terminal() {
                    seat_team(third, loser)?;
                }
            }
            self.settle_third_place();
        }

        let Some(next) = next else {
            return Ok(());
        };
        let feeders = self.feeder_count(next);
        let successor = self.fixture_mut(next)?;
        seat_team(successor, winner)?;

        if feeders == 1 {
            successor.award_walkover(winner);
            log::debug!(
                "Team {} passes through bracket slot {}:{}",
                winner,
                next.round,
                next.index
            );
            return self.advance(next);
        }

        if successor.has_both_teams() && successor.status == FixtureStatus::Pending {
            successor.status = FixtureStatus::Scheduled;
        }
        Ok(())
    }

    /// Resolve the third-place match once every semi-final is decided
    pub(crate) fn settle_third_place(&mut self) {
        let total = self.rounds.len();
        if total < 2 {
            return;
        }
        let semis = &self.rounds[total - 2];
        let Some(third) = self.third_place.as_mut() else {
            return;
        };
        if third.status.is_terminal() || !semis.iter().all(|f| f.winner.is_some()) {
            return;
        }

        if third.has_both_teams() {
            if third.status == FixtureStatus::Pending {
                third.status = FixtureStatus::Scheduled;
            }
            return;
        }
        match third.team1.or(third.team2) {
            Some(only) => third.award_walkover(only),
            None => third.status = FixtureStatus::Cancelled,
        }
    }
}

/// Place `team` in the first open seat of `fixture`
///
/// # Errors
///
/// * `SeatConflict` if the team already sits in the fixture
/// * `SeatsFilled` if both seats are taken
/// * `FixtureDecided` if the fixture already has a result
pub(crate) fn seat_team(fixture: &mut Fixture, team: TeamId) -> EngineResult<()> {
    if fixture.status.is_terminal() {
        return Err(EngineError::FixtureDecided(fixture.id));
    }
    if fixture.involves(team) {
        return Err(EngineError::SeatConflict {
            fixture: fixture.id,
            team,
        });
    }
    if fixture.team1.is_none() {
        fixture.team1 = Some(team);
    } else if fixture.team2.is_none() {
        fixture.team2 = Some(team);
    } else {
        return Err(EngineError::SeatsFilled(fixture.id));
    }
    Ok(())
}
