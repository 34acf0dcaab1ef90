//! In-memory repository.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TournamentRepository;
use crate::errors::{EngineError, EngineResult};
use crate::models::{Fixture, FixtureId, Group, Team, TeamId, Tournament, TournamentId};

#[derive(Debug, Default)]
struct Store {
    tournaments: HashMap<TournamentId, Tournament>,
    teams: HashMap<TeamId, Team>,
    groups: HashMap<TournamentId, Vec<Group>>,
    fixtures: BTreeMap<FixtureId, Fixture>,
    next_fixture_id: FixtureId,
}

/// Repository backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tournament(mut self, tournament: Tournament) -> Self {
        self.store
            .get_mut()
            .tournaments
            .insert(tournament.id, tournament);
        self
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.store.get_mut().teams.insert(team.id, team);
        self
    }

    pub fn with_teams(self, teams: impl IntoIterator<Item = Team>) -> Self {
        teams.into_iter().fold(self, Self::with_team)
    }

    /// Register or replace a tournament
    pub async fn insert_tournament(&self, tournament: Tournament) {
        self.store
            .write()
            .await
            .tournaments
            .insert(tournament.id, tournament);
    }

    /// Register or replace a team
    pub async fn insert_team(&self, team: Team) {
        self.store.write().await.teams.insert(team.id, team);
    }
}

#[async_trait]
impl TournamentRepository for InMemoryRepository {
    async fn find_tournament(&self, id: TournamentId) -> EngineResult<Option<Tournament>> {
        Ok(self.store.read().await.tournaments.get(&id).cloned())
    }

    async fn find_team(&self, id: TeamId) -> EngineResult<Option<Team>> {
        Ok(self.store.read().await.teams.get(&id).cloned())
    }

    async fn save_groups(&self, tournament_id: TournamentId, groups: &[Group]) -> EngineResult<()> {
        let mut store = self.store.write().await;
        if store
            .groups
            .get(&tournament_id)
            .is_some_and(|existing| !existing.is_empty())
        {
            return Err(EngineError::AlreadyGenerated(format!(
                "groups for tournament {tournament_id}"
            )));
        }
        store.groups.insert(tournament_id, groups.to_vec());
        Ok(())
    }

    async fn find_groups(&self, tournament_id: TournamentId) -> EngineResult<Vec<Group>> {
        let store = self.store.read().await;
        let mut groups = store.groups.get(&tournament_id).cloned().unwrap_or_default();
        groups.sort_by_key(|g| g.label);
        Ok(groups)
    }

    async fn insert_fixtures(&self, fixtures: Vec<Fixture>) -> EngineResult<Vec<Fixture>> {
        let mut store = self.store.write().await;

        for fixture in &fixtures {
            let tournament_id = fixture.tournament_id;
            let stored = || {
                store
                    .fixtures
                    .values()
                    .filter(move |f| f.tournament_id == tournament_id)
            };
            if fixture.is_bracket() && stored().any(Fixture::is_bracket) {
                return Err(EngineError::BracketAlreadyGenerated(tournament_id));
            }
            if fixture.group.is_some() && stored().any(|f| f.group.is_some()) {
                return Err(EngineError::AlreadyGenerated(format!(
                    "group fixtures for tournament {tournament_id}"
                )));
            }
        }

        let mut inserted = Vec::with_capacity(fixtures.len());
        for mut fixture in fixtures {
            store.next_fixture_id += 1;
            fixture.id = store.next_fixture_id;
            fixture.version = 0;
            store.fixtures.insert(fixture.id, fixture.clone());
            inserted.push(fixture);
        }
        Ok(inserted)
    }

    async fn list_fixtures(&self, tournament_id: TournamentId) -> EngineResult<Vec<Fixture>> {
        Ok(self
            .store
            .read()
            .await
            .fixtures
            .values()
            .filter(|f| f.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    async fn find_fixture(&self, id: FixtureId) -> EngineResult<Option<Fixture>> {
        Ok(self.store.read().await.fixtures.get(&id).cloned())
    }

    async fn update_fixtures(&self, fixtures: &[Fixture]) -> EngineResult<Vec<Fixture>> {
        let mut store = self.store.write().await;

        for fixture in fixtures {
            let stored = store
                .fixtures
                .get(&fixture.id)
                .ok_or(EngineError::FixtureNotFound(fixture.id))?;
            if stored.version != fixture.version {
                return Err(EngineError::StaleFixture {
                    fixture: fixture.id,
                    expected: fixture.version,
                    found: stored.version,
                });
            }
        }

        let mut updated = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let mut fixture = fixture.clone();
            fixture.version += 1;
            store.fixtures.insert(fixture.id, fixture.clone());
            updated.push(fixture);
        }
        Ok(updated)
    }
}
