//! Repository trait for tournament persistence.
//!
//! The engine never talks to a storage driver directly; it loads and stores
//! through this trait so storage backends can be swapped and tests can run
//! against [`InMemoryRepository`](super::InMemoryRepository).

use async_trait::async_trait;

use crate::errors::EngineResult;
use crate::models::{Fixture, FixtureId, Group, Team, TeamId, Tournament, TournamentId};

/// Storage operations used by the engine
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Find tournament by ID
    async fn find_tournament(&self, id: TournamentId) -> EngineResult<Option<Tournament>>;

    /// Find team by ID
    async fn find_team(&self, id: TeamId) -> EngineResult<Option<Team>>;

    /// Store the groups of a tournament
    ///
    /// Fails with `AlreadyGenerated` if groups are already stored.
    async fn save_groups(&self, tournament_id: TournamentId, groups: &[Group]) -> EngineResult<()>;

    /// Groups of a tournament in label order (empty if none)
    async fn find_groups(&self, tournament_id: TournamentId) -> EngineResult<Vec<Group>>;

    /// Insert new fixtures, returning them with assigned IDs
    ///
    /// The check and the insert happen in one atomic write:
    ///
    /// * `BracketAlreadyGenerated` if a bracket fixture is inserted for a
    ///   tournament that already has one
    /// * `AlreadyGenerated` if group fixtures are inserted for a tournament
    ///   that already has group fixtures
    async fn insert_fixtures(&self, fixtures: Vec<Fixture>) -> EngineResult<Vec<Fixture>>;

    /// All fixtures of a tournament in insertion order
    async fn list_fixtures(&self, tournament_id: TournamentId) -> EngineResult<Vec<Fixture>>;

    /// Find fixture by ID
    async fn find_fixture(&self, id: FixtureId) -> EngineResult<Option<Fixture>>;

    /// Store modified fixtures atomically
    ///
    /// Each fixture's `version` must match the stored one. On success every
    /// stored version is bumped and the stored fixtures are returned. If any
    /// check fails nothing is written and `StaleFixture` is returned.
    async fn update_fixtures(&self, fixtures: &[Fixture]) -> EngineResult<Vec<Fixture>>;
}
