//! Tournament actor: the single writer for one tournament.

use tokio::sync::{mpsc, oneshot};

use super::messages::{Reply, TournamentMessage};
use crate::bracket::{BracketView, SeriesProgress};
use crate::draw::DrawSource;
use crate::engine::TournamentEngine;
use crate::errors::{EngineError, EngineResult, ErrorKind};
use crate::models::{Fixture, FixtureId, FixtureStatus, GameScore, Group, TeamId, TournamentId};
use crate::standings::GroupTable;

/// Tournament actor handle for sending messages
#[derive(Clone)]
pub struct TournamentHandle {
    sender: mpsc::Sender<TournamentMessage>,
    tournament_id: TournamentId,
}

impl TournamentHandle {
    /// Create a new tournament handle
    pub fn new(sender: mpsc::Sender<TournamentMessage>, tournament_id: TournamentId) -> Self {
        Self {
            sender,
            tournament_id,
        }
    }

    /// Get tournament ID
    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    /// Whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> TournamentMessage,
    ) -> EngineResult<T> {
        let (response, reply) = oneshot::channel();
        self.sender
            .send(build(response))
            .await
            .map_err(|_| EngineError::ActorUnavailable(self.tournament_id))?;
        reply
            .await
            .map_err(|_| EngineError::ActorUnavailable(self.tournament_id))?
    }

    pub async fn generate_groups(&self) -> EngineResult<Vec<Group>> {
        self.request(|response| TournamentMessage::GenerateGroups { response })
            .await
    }

    pub async fn generate_group_fixtures(&self) -> EngineResult<Vec<Fixture>> {
        self.request(|response| TournamentMessage::GenerateGroupFixtures { response })
            .await
    }

    pub async fn generate_elimination_bracket(&self) -> EngineResult<Vec<Fixture>> {
        self.request(|response| TournamentMessage::GenerateEliminationBracket { response })
            .await
    }

    pub async fn generate_playoff_bracket(&self) -> EngineResult<Vec<Fixture>> {
        self.request(|response| TournamentMessage::GeneratePlayoffBracket { response })
            .await
    }

    pub async fn record_game_result(
        &self,
        fixture_id: FixtureId,
        game: GameScore,
    ) -> EngineResult<SeriesProgress> {
        self.request(|response| TournamentMessage::RecordGameResult {
            fixture_id,
            game,
            response,
        })
        .await
    }

    pub async fn record_match_result(
        &self,
        fixture_id: FixtureId,
        result: GameScore,
    ) -> EngineResult<SeriesProgress> {
        self.request(|response| TournamentMessage::RecordMatchResult {
            fixture_id,
            result,
            response,
        })
        .await
    }

    pub async fn record_walkover(&self, fixture_id: FixtureId, winner: TeamId) -> EngineResult<()> {
        self.request(|response| TournamentMessage::RecordWalkover {
            fixture_id,
            winner,
            response,
        })
        .await
    }

    pub async fn set_fixture_status(
        &self,
        fixture_id: FixtureId,
        status: FixtureStatus,
    ) -> EngineResult<Fixture> {
        self.request(|response| TournamentMessage::SetFixtureStatus {
            fixture_id,
            status,
            response,
        })
        .await
    }

    pub async fn standings(&self) -> EngineResult<Vec<GroupTable>> {
        self.request(|response| TournamentMessage::GetStandings { response })
            .await
    }

    pub async fn bracket(&self) -> EngineResult<BracketView> {
        self.request(|response| TournamentMessage::GetBracket { response })
            .await
    }

    /// Ask the actor to stop
    pub async fn shutdown(&self) {
        let _ = self.sender.send(TournamentMessage::Shutdown).await;
    }
}

/// Actor owning all writes for a single tournament
///
/// Messages are handled one at a time, so two generation requests or two
/// results feeding the same successor can never interleave.
pub struct TournamentActor {
    id: TournamentId,
    engine: TournamentEngine,
    draw: Box<dyn DrawSource>,
    inbox: mpsc::Receiver<TournamentMessage>,
}

impl TournamentActor {
    /// Create a new tournament actor
    ///
    /// # Returns
    ///
    /// * `(TournamentActor, TournamentHandle)` - Actor and handle for sending messages
    pub fn new(
        id: TournamentId,
        engine: TournamentEngine,
        draw: Box<dyn DrawSource>,
    ) -> (Self, TournamentHandle) {
        let (sender, inbox) = mpsc::channel(engine.config().inbox_capacity.max(1));

        let actor = Self {
            id,
            engine,
            draw,
            inbox,
        };

        (actor, TournamentHandle::new(sender, id))
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        log::info!("Tournament {} actor starting", self.id);

        while let Some(message) = self.inbox.recv().await {
            if matches!(message, TournamentMessage::Shutdown) {
                break;
            }
            self.handle_message(message).await;
        }

        log::info!("Tournament {} actor stopped", self.id);
    }

    async fn handle_message(&mut self, message: TournamentMessage) {
        let id = self.id;
        match message {
            TournamentMessage::GenerateGroups { response } => {
                let result = self.engine.generate_groups(id, self.draw.as_mut()).await;
                reply(id, response, result);
            }

            TournamentMessage::GenerateGroupFixtures { response } => {
                let result = self.engine.generate_group_fixtures(id).await;
                reply(id, response, result);
            }

            TournamentMessage::GenerateEliminationBracket { response } => {
                let result = self
                    .engine
                    .generate_elimination_bracket(id, self.draw.as_mut())
                    .await;
                reply(id, response, result);
            }

            TournamentMessage::GeneratePlayoffBracket { response } => {
                let result = self
                    .engine
                    .generate_playoff_bracket(id, self.draw.as_mut())
                    .await;
                reply(id, response, result);
            }

            TournamentMessage::RecordGameResult {
                fixture_id,
                game,
                response,
            } => {
                let result = match own_fixture(&self.engine, id, fixture_id).await {
                    Ok(()) => {
                        self.engine
                            .record_game_result(fixture_id, &game, self.draw.as_mut())
                            .await
                    }
                    Err(e) => Err(e),
                };
                reply(id, response, result);
            }

            TournamentMessage::RecordMatchResult {
                fixture_id,
                result,
                response,
            } => {
                let outcome = match own_fixture(&self.engine, id, fixture_id).await {
                    Ok(()) => self.engine.record_match_result(fixture_id, &result).await,
                    Err(e) => Err(e),
                };
                reply(id, response, outcome);
            }

            TournamentMessage::RecordWalkover {
                fixture_id,
                winner,
                response,
            } => {
                let result = match own_fixture(&self.engine, id, fixture_id).await {
                    Ok(()) => self.engine.record_walkover(fixture_id, winner).await,
                    Err(e) => Err(e),
                };
                reply(id, response, result);
            }

            TournamentMessage::SetFixtureStatus {
                fixture_id,
                status,
                response,
            } => {
                let result = match own_fixture(&self.engine, id, fixture_id).await {
                    Ok(()) => self.engine.set_fixture_status(fixture_id, status).await,
                    Err(e) => Err(e),
                };
                reply(id, response, result);
            }

            TournamentMessage::GetStandings { response } => {
                let result = self.engine.compute_standings(id).await;
                reply(id, response, result);
            }

            TournamentMessage::GetBracket { response } => {
                let result = self.engine.compute_bracket_view(id).await;
                reply(id, response, result);
            }

            TournamentMessage::Shutdown => {}
        }
    }
}

/// Reject fixtures that belong to another tournament
async fn own_fixture(
    engine: &TournamentEngine,
    tournament_id: TournamentId,
    fixture_id: FixtureId,
) -> EngineResult<()> {
    match engine.repository().find_fixture(fixture_id).await? {
        Some(fixture) if fixture.tournament_id == tournament_id => Ok(()),
        _ => Err(EngineError::FixtureNotFound(fixture_id)),
    }
}

fn reply<T>(id: TournamentId, response: Reply<T>, result: EngineResult<T>) {
    if let Err(e) = &result {
        match e.kind() {
            ErrorKind::Conflict | ErrorKind::Persistence => {
                log::warn!("Tournament {}: {}", id, e)
            }
            _ => log::debug!("Tournament {}: {}", id, e),
        }
    }
    // caller may have given up waiting
    let _ = response.send(result);
}
