//! Engine configuration.
//!
//! Values come from the environment with defaults for anything unset or
//! unparseable.

use std::env;

use crate::groups::GROUP_LABELS;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of each tournament actor's message inbox
    pub inbox_capacity: usize,

    /// Fixed seed for draws; OS-seeded when `None`
    pub draw_seed: Option<u64>,

    /// Upper bound on the number of groups (1..=8)
    pub max_groups: usize,
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TOURNEY_INBOX_CAPACITY`: actor inbox size (default: 100)
    /// - `TOURNEY_DRAW_SEED`: reproducible draw seed (default: unset)
    /// - `TOURNEY_MAX_GROUPS`: group cap, clamped to 1..=8 (default: 8)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            inbox_capacity: env::var("TOURNEY_INBOX_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&capacity| capacity > 0)
                .unwrap_or(defaults.inbox_capacity),
            draw_seed: env::var("TOURNEY_DRAW_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
            max_groups: env::var("TOURNEY_MAX_GROUPS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map_or(defaults.max_groups, |groups| {
                    groups.clamp(1, GROUP_LABELS.len())
                }),
        }
    }

    pub fn with_draw_seed(mut self, seed: u64) -> Self {
        self.draw_seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 100,
            draw_seed: None,
            max_groups: GROUP_LABELS.len(),
        }
    }
}
