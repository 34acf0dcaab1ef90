//! # Tourney
//!
//! Generation and progression engine for multi-sport tournaments.
//!
//! The engine builds the competitive structure of an event, records results
//! and derives standings. Round-robin groups feed a knockout playoff, or a
//! knockout bracket is drawn straight from the roster.
//!
//! ## Pipeline
//!
//! - **Groups**: the roster is shuffled and dealt into balanced groups `A`..`H`
//! - **Fixtures**: each group plays a single or double round-robin, packed
//!   into matchdays where no team plays twice
//! - **Standings**: tables are folded from completed fixtures using the
//!   sport's scoring rules, then ranked with a head-to-head tie-break
//! - **Bracket**: qualifiers (or the full roster) are drawn into a
//!   single-elimination tree; byes become walkovers
//! - **Series**: best-of-N games are recorded until a side has enough wins,
//!   and the winner is seated in the next round
//!
//! ## Core Modules
//!
//! - [`rules`]: goal-based and set-based scoring, dispatched with `enum_dispatch`
//! - [`groups`]: allocation and round-robin scheduling
//! - [`standings`]: group tables and qualifier selection
//! - [`bracket`]: bracket construction, series progression, placements
//! - [`engine`]: triggers that load, compute and persist through [`db`]
//! - [`tournament`]: one actor per tournament serializing all writes
//!
//! ## Example
//!
//! ```
//! use tourney::groups::schedule_group;
//! use tourney::models::{Group, Legs};
//!
//! let group = Group { label: 'A', team_ids: vec![1, 2, 3, 4] };
//! let fixtures = schedule_group(1, &group, Legs::Single);
//! assert_eq!(fixtures.len(), 6);
//! ```

/// Elimination brackets and best-of-N series.
pub mod bracket;
pub use bracket::{Bracket, BracketView, SeriesProgress};

/// Engine configuration from the environment.
pub mod config;
pub use config::EngineConfig;

/// Persistence boundary.
pub mod db;
pub use db::{InMemoryRepository, TournamentRepository};

/// Injectable randomness.
pub mod draw;
pub use draw::{DrawRandomizer, DrawSource, OrderedDraw};

pub mod engine;
pub use engine::TournamentEngine;

pub mod errors;
pub use errors::{EngineError, EngineResult, ErrorKind};

/// Group allocation and round-robin scheduling.
pub mod groups;

/// Tournaments, teams, groups and fixtures.
pub mod models;

/// Sport-specific scoring rules.
pub mod rules;
pub use rules::{GoalBased, ScoringRules, SetBased, SportRules};

pub mod standings;
pub use standings::{GroupTable, StandingRow};

/// Per-tournament actors.
pub mod tournament;
pub use tournament::{TournamentActor, TournamentHandle, TournamentManager};
