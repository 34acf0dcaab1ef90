//! Group stage generation.
//!
//! - [`allocate_groups`]: deal a roster into balanced groups `A`..`H`
//! - [`schedule_group`]: single or double round-robin fixtures with matchdays

pub mod allocator;
pub mod scheduler;

pub use allocator::{GROUP_LABELS, allocate_groups};
pub use scheduler::{assign_matchdays, round_robin_pairings, schedule_group};
