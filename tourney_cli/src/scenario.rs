//! Scenario files and the runner that plays them through the engine.
//!
//! A scenario names a tournament, optionally its teams, and a list of steps.
//! Steps are sent one at a time to the tournament's actor; the first failing
//! step aborts the run. Without steps the structure for the tournament's
//! format is generated and nothing is played.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tourney::models::{
    Fixture, FixtureId, FixtureStatus, Format, GameScore, Group, SetScore, Team, TeamId,
    Tournament,
};
use tourney::{
    BracketView, EngineConfig, EngineError, GroupTable, InMemoryRepository, SeriesProgress,
    TournamentEngine, TournamentHandle, TournamentManager, TournamentRepository,
};

/// Scenario file contents
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub tournament: Tournament,
    /// Registered teams; named `Team <id>` when omitted
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One request against the tournament
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    GenerateGroups,
    GenerateGroupFixtures,
    GenerateEliminationBracket,
    GeneratePlayoffBracket,
    /// Whole-match result
    Match {
        fixture_id: FixtureId,
        #[serde(default)]
        score1: u32,
        #[serde(default)]
        score2: u32,
        #[serde(default)]
        sets: Vec<SetScore>,
    },
    /// One game of a best-of-N series
    Game {
        fixture_id: FixtureId,
        #[serde(default)]
        score1: u32,
        #[serde(default)]
        score2: u32,
        #[serde(default)]
        sets: Vec<SetScore>,
    },
    Walkover {
        fixture_id: FixtureId,
        winner: TeamId,
    },
    Status {
        fixture_id: FixtureId,
        status: FixtureStatus,
    },
}

impl Step {
    fn describe(&self) -> String {
        match self {
            Step::GenerateGroups => "generate-groups".to_string(),
            Step::GenerateGroupFixtures => "generate-group-fixtures".to_string(),
            Step::GenerateEliminationBracket => "generate-elimination-bracket".to_string(),
            Step::GeneratePlayoffBracket => "generate-playoff-bracket".to_string(),
            Step::Match { fixture_id, .. } => format!("match on fixture {fixture_id}"),
            Step::Game { fixture_id, .. } => format!("game on fixture {fixture_id}"),
            Step::Walkover { fixture_id, .. } => format!("walkover on fixture {fixture_id}"),
            Step::Status { fixture_id, .. } => format!("status of fixture {fixture_id}"),
        }
    }
}

fn score(score1: u32, score2: u32, sets: &[SetScore]) -> GameScore {
    if sets.is_empty() {
        GameScore::new(score1, score2)
    } else {
        GameScore::from_sets(sets.to_vec())
    }
}

/// Structure generated when a scenario lists no steps
pub fn default_steps(format: Format) -> Vec<Step> {
    match format {
        Format::GroupStage => vec![Step::GenerateGroups, Step::GenerateGroupFixtures],
        Format::Elimination => vec![Step::GenerateEliminationBracket],
    }
}

/// Final state of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub tournament: Tournament,
    pub groups: Vec<Group>,
    pub fixtures: Vec<Fixture>,
    pub standings: Vec<GroupTable>,
    pub bracket: Option<BracketView>,
}

async fn apply(handle: &TournamentHandle, step: &Step) -> Result<(), EngineError> {
    match step {
        Step::GenerateGroups => {
            let groups = handle.generate_groups().await?;
            log::info!("Drew {} group(s)", groups.len());
        }
        Step::GenerateGroupFixtures => {
            let fixtures = handle.generate_group_fixtures().await?;
            log::info!("Scheduled {} group fixture(s)", fixtures.len());
        }
        Step::GenerateEliminationBracket => {
            let fixtures = handle.generate_elimination_bracket().await?;
            log::info!("Built bracket with {} fixture(s)", fixtures.len());
        }
        Step::GeneratePlayoffBracket => {
            let fixtures = handle.generate_playoff_bracket().await?;
            log::info!("Built playoff bracket with {} fixture(s)", fixtures.len());
        }
        Step::Match {
            fixture_id,
            score1,
            score2,
            sets,
        } => {
            let result = score(*score1, *score2, sets);
            handle.record_match_result(*fixture_id, result).await?;
        }
        Step::Game {
            fixture_id,
            score1,
            score2,
            sets,
        } => {
            let game = score(*score1, *score2, sets);
            let progress = handle.record_game_result(*fixture_id, game).await?;
            if let SeriesProgress::InProgress { wins } = progress {
                log::debug!("Fixture {} series at {}-{}", fixture_id, wins.0, wins.1);
            }
        }
        Step::Walkover { fixture_id, winner } => {
            handle.record_walkover(*fixture_id, *winner).await?;
        }
        Step::Status { fixture_id, status } => {
            handle.set_fixture_status(*fixture_id, *status).await?;
        }
    }
    Ok(())
}

/// Play a scenario against a fresh in-memory engine
///
/// # Errors
///
/// Fails on the first step the engine rejects, naming the step.
pub async fn run(scenario: Scenario, config: EngineConfig) -> Result<Report> {
    let Scenario {
        tournament,
        teams,
        steps,
    } = scenario;
    let tournament_id = tournament.id;
    let format = tournament.format;

    let teams = if teams.is_empty() {
        tournament
            .team_ids
            .iter()
            .map(|&id| Team::new(id, format!("Team {id}")))
            .collect()
    } else {
        teams
    };

    let repo = Arc::new(
        InMemoryRepository::new()
            .with_tournament(tournament.clone())
            .with_teams(teams),
    );
    let engine = TournamentEngine::new(repo.clone(), config);
    let manager = TournamentManager::new(engine);
    let handle = manager.handle(tournament_id).await?;

    let steps = if steps.is_empty() {
        default_steps(format)
    } else {
        steps
    };

    for (number, step) in steps.iter().enumerate() {
        apply(&handle, step)
            .await
            .with_context(|| format!("Step {} ({}) failed", number + 1, step.describe()))?;
    }

    let standings = match format {
        Format::GroupStage => handle.standings().await?,
        Format::Elimination => Vec::new(),
    };
    let bracket = match handle.bracket().await {
        Ok(view) => Some(view),
        Err(EngineError::StageIncomplete(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let report = Report {
        tournament,
        groups: repo.find_groups(tournament_id).await?,
        fixtures: repo.list_fixtures(tournament_id).await?,
        standings,
        bracket,
    };

    manager.shutdown(tournament_id).await;
    Ok(report)
}
