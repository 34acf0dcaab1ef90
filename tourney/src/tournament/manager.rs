//! Tournament manager for spawning and looking up tournament actors.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::actor::{TournamentActor, TournamentHandle};
use crate::draw::{DrawRandomizer, DrawSource};
use crate::engine::TournamentEngine;
use crate::errors::{EngineError, EngineResult};
use crate::models::TournamentId;

/// Builds the draw source for a newly spawned actor
pub type DrawFactory = Arc<dyn Fn(TournamentId) -> Box<dyn DrawSource> + Send + Sync>;

/// Keeps one actor per tournament
pub struct TournamentManager {
    engine: TournamentEngine,

    /// Active tournament handles
    tournaments: Arc<RwLock<HashMap<TournamentId, TournamentHandle>>>,

    draw_factory: DrawFactory,
}

impl TournamentManager {
    /// Create a manager whose actors draw from [`DrawRandomizer`]
    ///
    /// With a configured seed each tournament gets `seed + id`, so draws are
    /// reproducible per tournament.
    pub fn new(engine: TournamentEngine) -> Self {
        let seed = engine.config().draw_seed;
        Self::with_draw_factory(
            engine,
            Arc::new(move |id: TournamentId| -> Box<dyn DrawSource> {
                Box::new(DrawRandomizer::from_seed(
                    seed.map(|s| s.wrapping_add(id as u64)),
                ))
            }),
        )
    }

    pub fn with_draw_factory(engine: TournamentEngine, draw_factory: DrawFactory) -> Self {
        Self {
            engine,
            tournaments: Arc::new(RwLock::new(HashMap::new())),
            draw_factory,
        }
    }

    /// Get the running handle for a tournament
    pub async fn get(&self, tournament_id: TournamentId) -> Option<TournamentHandle> {
        let tournaments = self.tournaments.read().await;
        tournaments
            .get(&tournament_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Get the handle for a tournament, spawning its actor if needed
    ///
    /// # Errors
    ///
    /// * `TournamentNotFound` if the repository does not know the tournament
    pub async fn handle(&self, tournament_id: TournamentId) -> EngineResult<TournamentHandle> {
        if let Some(handle) = self.get(tournament_id).await {
            return Ok(handle);
        }

        self.engine
            .repository()
            .find_tournament(tournament_id)
            .await?
            .ok_or(EngineError::TournamentNotFound(tournament_id))?;

        let mut tournaments = self.tournaments.write().await;
        // another caller may have spawned it while we were checking
        if let Some(handle) = tournaments
            .get(&tournament_id)
            .filter(|handle| !handle.is_closed())
        {
            return Ok(handle.clone());
        }

        let (actor, handle) = TournamentActor::new(
            tournament_id,
            self.engine.clone(),
            (self.draw_factory)(tournament_id),
        );
        tournaments.insert(tournament_id, handle.clone());
        drop(tournaments);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Spawned actor for tournament {}", tournament_id);
        Ok(handle)
    }

    /// Stop a tournament's actor
    ///
    /// Returns `false` if no actor was running.
    pub async fn shutdown(&self, tournament_id: TournamentId) -> bool {
        let handle = self.tournaments.write().await.remove(&tournament_id);
        match handle {
            Some(handle) => {
                handle.shutdown().await;
                true
            }
            None => false,
        }
    }

    /// Number of running actors
    pub async fn active_count(&self) -> usize {
        let tournaments = self.tournaments.read().await;
        tournaments.values().filter(|h| !h.is_closed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::db::InMemoryRepository;
    use crate::draw::OrderedDraw;
    use crate::models::{Format, Sport, Team, Tournament};

    fn manager() -> TournamentManager {
        let repo = InMemoryRepository::new()
            .with_tournament(
                Tournament::new(1, "League", Sport::Soccer, Format::GroupStage)
                    .with_teams(vec![1, 2, 3, 4]),
            )
            .with_teams((1..=4).map(|id| Team::new(id, format!("Team {id}"))));
        let engine = TournamentEngine::new(Arc::new(repo), EngineConfig::default());
        TournamentManager::with_draw_factory(
            engine,
            Arc::new(|_: TournamentId| Box::new(OrderedDraw::default()) as Box<dyn DrawSource>),
        )
    }

    #[tokio::test]
    async fn test_handle_is_reused() {
        let manager = manager();
        let first = manager.handle(1).await.unwrap();
        let second = manager.handle(1).await.unwrap();
        assert_eq!(first.tournament_id(), second.tournament_id());
        assert_eq!(manager.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_tournament() {
        let manager = manager();
        let err = manager.handle(99).await.err().unwrap();
        assert!(matches!(err, EngineError::TournamentNotFound(99)));
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let manager = manager();
        let handle = manager.handle(1).await.unwrap();
        assert!(manager.shutdown(1).await);
        assert!(!manager.shutdown(1).await);

        let err = handle.generate_groups().await.unwrap_err();
        assert!(matches!(err, EngineError::ActorUnavailable(1)));
    }

    #[tokio::test]
    async fn test_groups_through_actor() {
        let manager = manager();
        let handle = manager.handle(1).await.unwrap();
        let groups = handle.generate_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].team_ids, vec![1, 2, 3, 4]);
    }
}
