//! Engine error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FixtureId, FixtureStatus, Format, TeamId, TournamentId};

/// Broad error category reported to the boundary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Precondition,
    Conflict,
    Persistence,
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Roster is empty
    #[error("Tournament has no teams")]
    NoTeams,

    /// Roster is below the minimum for the requested structure
    #[error("Not enough teams: need {needed}, have {current}")]
    NotEnoughTeams { needed: usize, current: usize },

    /// Same team listed twice
    #[error("Team {0} listed more than once")]
    DuplicateTeam(TeamId),

    /// Tournament settings cannot produce a structure
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Malformed score
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// A single set violates the set rules (1-indexed set number)
    #[error("Invalid set {set}: {reason}")]
    InvalidSet { set: usize, reason: String },

    /// Per-set detail does not add up to the recorded tally
    #[error("Set totals {detail:?} do not match recorded score {recorded:?}")]
    SetTotalsMismatch {
        detail: (u32, u32),
        recorded: (u32, u32),
    },

    /// Draw recorded where the rules or the round forbid one
    #[error("Draws are not allowed here")]
    DrawNotAllowed,

    /// Winner is not one of the fixture's teams
    #[error("Team {team} is not playing fixture {fixture}")]
    NotAParticipant { fixture: FixtureId, team: TeamId },

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Fixture not found: {0}")]
    FixtureNotFound(FixtureId),

    /// Operation requires a different tournament format
    #[error("Wrong tournament format: expected {expected:?}, got {actual:?}")]
    WrongFormat { expected: Format, actual: Format },

    /// A prerequisite stage has not finished
    #[error("Stage incomplete: {0}")]
    StageIncomplete(String),

    #[error("Bracket already generated for tournament {0}")]
    BracketAlreadyGenerated(TournamentId),

    /// Fixture is not in a state that accepts the operation
    #[error("Fixture {fixture} cannot accept this operation while {status:?}")]
    InvalidFixtureState {
        fixture: FixtureId,
        status: FixtureStatus,
    },

    /// Groups or group fixtures already exist
    #[error("Already generated: {0}")]
    AlreadyGenerated(String),

    /// Seating the winner would make a team play itself
    #[error("Team {team} is already seated in fixture {fixture}")]
    SeatConflict { fixture: FixtureId, team: TeamId },

    /// Both seats of the successor are already taken
    #[error("Fixture {0} has no open seat")]
    SeatsFilled(FixtureId),

    /// Fixture already has a result and takes no further teams
    #[error("Fixture {0} is already decided")]
    FixtureDecided(FixtureId),

    /// Optimistic concurrency check failed
    #[error("Fixture {fixture} was modified concurrently: expected version {expected}, found {found}")]
    StaleFixture {
        fixture: FixtureId,
        expected: u64,
        found: u64,
    },

    /// Opaque storage failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Tournament actor stopped before replying
    #[error("Tournament {0} is not accepting requests")]
    ActorUnavailable(TournamentId),
}

impl EngineError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NoTeams
            | EngineError::NotEnoughTeams { .. }
            | EngineError::DuplicateTeam(_)
            | EngineError::InvalidSettings(_)
            | EngineError::InvalidScore(_)
            | EngineError::InvalidSet { .. }
            | EngineError::SetTotalsMismatch { .. }
            | EngineError::DrawNotAllowed
            | EngineError::NotAParticipant { .. } => ErrorKind::Validation,

            EngineError::TournamentNotFound(_)
            | EngineError::TeamNotFound(_)
            | EngineError::FixtureNotFound(_) => ErrorKind::NotFound,

            EngineError::WrongFormat { .. }
            | EngineError::StageIncomplete(_)
            | EngineError::BracketAlreadyGenerated(_)
            | EngineError::InvalidFixtureState { .. } => ErrorKind::Precondition,

            EngineError::AlreadyGenerated(_)
            | EngineError::SeatConflict { .. }
            | EngineError::SeatsFilled(_)
            | EngineError::FixtureDecided(_)
            | EngineError::StaleFixture { .. } => ErrorKind::Conflict,

            EngineError::Persistence(_) | EngineError::ActorUnavailable(_) => {
                ErrorKind::Persistence
            }
        }
    }

    /// Get a client-safe error message
    ///
    /// Storage errors are replaced with a generic message so backend details
    /// never reach the transport layer.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::Persistence(_) | EngineError::ActorUnavailable(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
