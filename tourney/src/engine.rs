//! Trigger orchestration.
//!
//! Every trigger follows the same shape: load from the repository, run the
//! synchronous generator or state machine, then persist. Nothing is written
//! when a step fails, and bracket updates only store the fixtures that
//! actually changed.
//!
//! The engine itself does not serialize concurrent calls; route writes for
//! one tournament through its [`TournamentActor`](crate::tournament::TournamentActor).

use std::collections::HashMap;
use std::sync::Arc;

use crate::bracket::{self, Bracket, BracketView, SeriesProgress, build_bracket};
use crate::config::EngineConfig;
use crate::db::TournamentRepository;
use crate::draw::DrawSource;
use crate::errors::{EngineError, EngineResult};
use crate::groups::{allocate_groups, schedule_group};
use crate::models::{
    Fixture, FixtureId, FixtureStatus, Format, GameScore, Group, TeamId, Tournament,
    TournamentId,
};
use crate::standings::{GroupTable, group_table, select_qualifiers};

/// Tournament engine bound to a repository
#[derive(Clone)]
pub struct TournamentEngine {
    repo: Arc<dyn TournamentRepository>,
    config: EngineConfig,
}

impl TournamentEngine {
    pub fn new(repo: Arc<dyn TournamentRepository>, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn TournamentRepository> {
        &self.repo
    }

    async fn load_tournament(&self, id: TournamentId) -> EngineResult<Tournament> {
        self.repo
            .find_tournament(id)
            .await?
            .ok_or(EngineError::TournamentNotFound(id))
    }

    async fn load_fixture(&self, id: FixtureId) -> EngineResult<Fixture> {
        self.repo
            .find_fixture(id)
            .await?
            .ok_or(EngineError::FixtureNotFound(id))
    }

    /// Registered team ids, each checked against the repository
    async fn roster(&self, tournament: &Tournament) -> EngineResult<Vec<TeamId>> {
        for &team_id in &tournament.team_ids {
            if self.repo.find_team(team_id).await?.is_none() {
                return Err(EngineError::TeamNotFound(team_id));
            }
        }
        Ok(tournament.team_ids.clone())
    }

    async fn ensure_no_bracket(&self, tournament_id: TournamentId) -> EngineResult<()> {
        let fixtures = self.repo.list_fixtures(tournament_id).await?;
        if fixtures.iter().any(Fixture::is_bracket) {
            return Err(EngineError::BracketAlreadyGenerated(tournament_id));
        }
        Ok(())
    }

    /// Allocate the roster into labelled groups
    pub async fn generate_groups(
        &self,
        tournament_id: TournamentId,
        draw: &mut dyn DrawSource,
    ) -> EngineResult<Vec<Group>> {
        let tournament = self.load_tournament(tournament_id).await?;
        tournament.require_format(Format::GroupStage)?;

        if !self.repo.find_groups(tournament_id).await?.is_empty() {
            return Err(EngineError::AlreadyGenerated(format!(
                "groups for tournament {tournament_id}"
            )));
        }

        let roster = self.roster(&tournament).await?;
        let groups = allocate_groups(
            &roster,
            tournament.group_stage.teams_per_group,
            self.config.max_groups,
            draw,
        )?;
        self.repo.save_groups(tournament_id, &groups).await?;

        log::info!(
            "Generated {} groups for tournament {}",
            groups.len(),
            tournament_id
        );
        Ok(groups)
    }

    /// Schedule round-robin fixtures for every group
    pub async fn generate_group_fixtures(
        &self,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<Fixture>> {
        let tournament = self.load_tournament(tournament_id).await?;
        tournament.require_format(Format::GroupStage)?;
        let legs = tournament.group_stage.legs()?;

        let groups = self.repo.find_groups(tournament_id).await?;
        if groups.is_empty() {
            return Err(EngineError::StageIncomplete(
                "groups have not been generated".to_string(),
            ));
        }

        let existing = self.repo.list_fixtures(tournament_id).await?;
        if existing.iter().any(|f| f.group.is_some()) {
            return Err(EngineError::AlreadyGenerated(format!(
                "group fixtures for tournament {tournament_id}"
            )));
        }

        let fixtures: Vec<Fixture> = groups
            .iter()
            .flat_map(|group| schedule_group(tournament_id, group, legs))
            .collect();
        let fixtures = self.repo.insert_fixtures(fixtures).await?;

        log::info!(
            "Scheduled {} group fixtures for tournament {}",
            fixtures.len(),
            tournament_id
        );
        Ok(fixtures)
    }

    /// Build a bracket from the full roster of an elimination tournament
    pub async fn generate_elimination_bracket(
        &self,
        tournament_id: TournamentId,
        draw: &mut dyn DrawSource,
    ) -> EngineResult<Vec<Fixture>> {
        let tournament = self.load_tournament(tournament_id).await?;
        tournament.require_format(Format::Elimination)?;
        self.ensure_no_bracket(tournament_id).await?;

        let roster = self.roster(&tournament).await?;
        let bracket = build_bracket(&tournament, &roster, draw)?;
        self.repo.insert_fixtures(bracket.into_fixtures()).await
    }

    /// Build the playoff bracket from group-stage qualifiers
    ///
    /// Every group fixture must be completed, walked over or cancelled.
    pub async fn generate_playoff_bracket(
        &self,
        tournament_id: TournamentId,
        draw: &mut dyn DrawSource,
    ) -> EngineResult<Vec<Fixture>> {
        let tournament = self.load_tournament(tournament_id).await?;
        tournament.require_format(Format::GroupStage)?;
        self.ensure_no_bracket(tournament_id).await?;

        let groups = self.repo.find_groups(tournament_id).await?;
        let fixtures = self.repo.list_fixtures(tournament_id).await?;
        let group_fixtures: Vec<&Fixture> = fixtures.iter().filter(|f| f.group.is_some()).collect();
        if groups.is_empty() || group_fixtures.is_empty() {
            return Err(EngineError::StageIncomplete(
                "group stage has not been scheduled".to_string(),
            ));
        }

        let unfinished = group_fixtures
            .iter()
            .filter(|f| !f.status.is_terminal())
            .count();
        if unfinished > 0 {
            return Err(EngineError::StageIncomplete(format!(
                "{unfinished} group fixtures are unfinished"
            )));
        }

        let rules = tournament.rules();
        let tables: Vec<GroupTable> = groups
            .iter()
            .map(|group| group_table(group, &fixtures, &rules))
            .collect();
        let qualifiers =
            select_qualifiers(&tables, tournament.group_stage.teams_advancing_per_group);

        let bracket = build_bracket(&tournament, &qualifiers, draw)?;
        log::info!(
            "Playoff bracket for tournament {} seeded with {} qualifiers",
            tournament_id,
            qualifiers.len()
        );
        self.repo.insert_fixtures(bracket.into_fixtures()).await
    }

    /// Record one game of a bracket series, or the result of a group fixture
    pub async fn record_game_result(
        &self,
        fixture_id: FixtureId,
        game: &GameScore,
        draw: &mut dyn DrawSource,
    ) -> EngineResult<SeriesProgress> {
        let fixture = self.load_fixture(fixture_id).await?;
        let tournament = self.load_tournament(fixture.tournament_id).await?;
        let rules = tournament.rules();

        if !fixture.is_bracket() {
            return self
                .update_fixture(fixture, |f| bracket::record_match(f, game, &rules))
                .await;
        }

        self.update_bracket(&tournament, |b| {
            b.apply_game(fixture_id, game, tournament.best_of, &rules, draw)
        })
        .await
    }

    /// Record the full result of a fixture
    pub async fn record_match_result(
        &self,
        fixture_id: FixtureId,
        result: &GameScore,
    ) -> EngineResult<SeriesProgress> {
        let fixture = self.load_fixture(fixture_id).await?;
        let tournament = self.load_tournament(fixture.tournament_id).await?;
        let rules = tournament.rules();

        if !fixture.is_bracket() {
            return self
                .update_fixture(fixture, |f| bracket::record_match(f, result, &rules))
                .await;
        }

        self.update_bracket(&tournament, |b| b.apply_match(fixture_id, result, &rules))
            .await
    }

    /// Award a fixture without play
    pub async fn record_walkover(&self, fixture_id: FixtureId, winner: TeamId) -> EngineResult<()> {
        let fixture = self.load_fixture(fixture_id).await?;

        if !fixture.is_bracket() {
            return self
                .update_fixture(fixture, |f| bracket::record_walkover(f, winner))
                .await;
        }

        let tournament = self.load_tournament(fixture.tournament_id).await?;
        self.update_bracket(&tournament, |b| b.apply_walkover(fixture_id, winner))
            .await
    }

    /// Postpone, reschedule or cancel a fixture
    pub async fn set_fixture_status(
        &self,
        fixture_id: FixtureId,
        status: FixtureStatus,
    ) -> EngineResult<Fixture> {
        let mut fixture = self.load_fixture(fixture_id).await?;
        bracket::set_status(&mut fixture, status)?;
        let mut updated = self.repo.update_fixtures(&[fixture]).await?;
        updated.pop().ok_or(EngineError::FixtureNotFound(fixture_id))
    }

    /// Ranked table of every group
    pub async fn compute_standings(
        &self,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<GroupTable>> {
        let tournament = self.load_tournament(tournament_id).await?;
        tournament.require_format(Format::GroupStage)?;

        let groups = self.repo.find_groups(tournament_id).await?;
        let fixtures = self.repo.list_fixtures(tournament_id).await?;
        let rules = tournament.rules();

        Ok(groups
            .iter()
            .map(|group| group_table(group, &fixtures, &rules))
            .collect())
    }

    /// Current bracket with champion and placements
    pub async fn compute_bracket_view(
        &self,
        tournament_id: TournamentId,
    ) -> EngineResult<BracketView> {
        self.load_tournament(tournament_id).await?;
        let fixtures = self.repo.list_fixtures(tournament_id).await?;
        let bracket = Bracket::from_fixtures(fixtures).ok_or_else(|| {
            EngineError::StageIncomplete("bracket has not been generated".to_string())
        })?;
        Ok(BracketView::from(&bracket))
    }

    async fn update_fixture<T>(
        &self,
        mut fixture: Fixture,
        apply: impl FnOnce(&mut Fixture) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let outcome = apply(&mut fixture)?;
        self.repo.update_fixtures(&[fixture]).await?;
        Ok(outcome)
    }

    async fn update_bracket<T>(
        &self,
        tournament: &Tournament,
        apply: impl FnOnce(&mut Bracket) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let before = self.repo.list_fixtures(tournament.id).await?;
        let mut bracket = Bracket::from_fixtures(before.clone()).ok_or_else(|| {
            EngineError::StageIncomplete("bracket has not been generated".to_string())
        })?;

        let outcome = apply(&mut bracket)?;

        let stored: HashMap<FixtureId, &Fixture> = before.iter().map(|f| (f.id, f)).collect();
        let changed: Vec<Fixture> = bracket
            .into_fixtures()
            .into_iter()
            .filter(|f| stored.get(&f.id).is_none_or(|old| *old != f))
            .collect();

        log::debug!(
            "Storing {} changed bracket fixtures for tournament {}",
            changed.len(),
            tournament.id
        );
        self.repo.update_fixtures(&changed).await?;
        Ok(outcome)
    }
}
