//! Tournament actor message types.

use tokio::sync::oneshot;

use crate::bracket::{BracketView, SeriesProgress};
use crate::errors::EngineResult;
use crate::models::{Fixture, FixtureId, FixtureStatus, GameScore, Group, TeamId};
use crate::standings::GroupTable;

/// Reply channel for a request
pub type Reply<T> = oneshot::Sender<EngineResult<T>>;

/// Messages that can be sent to a TournamentActor
#[derive(Debug)]
pub enum TournamentMessage {
    /// Allocate the roster into groups
    GenerateGroups { response: Reply<Vec<Group>> },

    /// Schedule round-robin fixtures for every group
    GenerateGroupFixtures { response: Reply<Vec<Fixture>> },

    /// Build a bracket from the full roster
    GenerateEliminationBracket { response: Reply<Vec<Fixture>> },

    /// Build a bracket from group-stage qualifiers
    GeneratePlayoffBracket { response: Reply<Vec<Fixture>> },

    /// Record one game of a series
    RecordGameResult {
        fixture_id: FixtureId,
        game: GameScore,
        response: Reply<SeriesProgress>,
    },

    /// Record a whole-match result
    RecordMatchResult {
        fixture_id: FixtureId,
        result: GameScore,
        response: Reply<SeriesProgress>,
    },

    /// Award a fixture without play
    RecordWalkover {
        fixture_id: FixtureId,
        winner: TeamId,
        response: Reply<()>,
    },

    /// Postpone, reschedule or cancel a fixture
    SetFixtureStatus {
        fixture_id: FixtureId,
        status: FixtureStatus,
        response: Reply<Fixture>,
    },

    /// Current group tables
    GetStandings { response: Reply<Vec<GroupTable>> },

    /// Current bracket view
    GetBracket { response: Reply<BracketView> },

    /// Stop the actor
    Shutdown,
}
