//! Data contracts shared with the persistence layer.

pub mod fixture;
pub mod tournament;

pub use fixture::{
    BracketSlot, Fixture, FixtureId, FixtureStatus, GameScore, RoundTag, SetScore, Side,
};
pub use tournament::{
    Format, Group, GroupLabel, GroupStageSettings, Legs, Placement, Sport, Team, TeamId,
    Tournament, TournamentId,
};
