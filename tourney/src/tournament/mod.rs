//! Per-tournament actors.
//!
//! This module implements:
//! - TournamentActor: async actor that owns every write for one tournament
//! - TournamentHandle: typed request methods over the actor's inbox
//! - TournamentManager: spawns and looks up actors by tournament id
//!
//! ## Architecture
//!
//! Each tournament runs in a separate Tokio task with an mpsc message inbox
//! and answers on oneshot channels. Generation triggers and result recording
//! for one tournament are therefore applied one at a time, while different
//! tournaments proceed in parallel.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tourney::{EngineConfig, InMemoryRepository, TournamentEngine, TournamentManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = Arc::new(InMemoryRepository::new());
//!     let engine = TournamentEngine::new(repo, EngineConfig::from_env());
//!     let manager = TournamentManager::new(engine);
//!
//!     let handle = manager.handle(1).await.unwrap();
//!     let groups = handle.generate_groups().await.unwrap();
//! }
//! ```

pub mod actor;
pub mod manager;
pub mod messages;

pub use actor::{TournamentActor, TournamentHandle};
pub use manager::{DrawFactory, TournamentManager};
pub use messages::{Reply, TournamentMessage};
