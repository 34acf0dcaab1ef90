//! Persistence boundary.
//!
//! The engine loads and stores tournaments, groups and fixtures through
//! [`TournamentRepository`]. [`InMemoryRepository`] backs tests and the
//! command-line driver.

pub mod memory;
pub mod repository;

pub use memory::InMemoryRepository;
pub use repository::TournamentRepository;
