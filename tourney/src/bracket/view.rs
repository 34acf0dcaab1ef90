//! Read-only bracket view.

use serde::{Deserialize, Serialize};

use super::Bracket;
use crate::models::{Fixture, Placement, RoundTag, TeamId};

/// One bracket round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    /// 1-indexed
    pub number: u32,
    pub tag: RoundTag,
    pub fixtures: Vec<Fixture>,
}

/// Snapshot of a bracket for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketView {
    pub total_rounds: u32,
    pub rounds: Vec<RoundView>,
    pub third_place: Option<Fixture>,
    pub champion: Option<TeamId>,
    pub placements: Vec<Placement>,
}

impl From<&Bracket> for BracketView {
    fn from(bracket: &Bracket) -> Self {
        let total_rounds = bracket.total_rounds();
        let rounds = bracket
            .rounds()
            .iter()
            .zip(1..)
            .map(|(fixtures, number)| RoundView {
                number,
                tag: RoundTag::for_bracket_round(number, total_rounds),
                fixtures: fixtures.clone(),
            })
            .collect();

        Self {
            total_rounds,
            rounds,
            third_place: bracket.third_place().cloned(),
            champion: bracket.champion(),
            placements: final_placements(bracket),
        }
    }
}

/// Positions decided so far
///
/// Final winner 1st, final loser 2nd. With a third-place match its winner is
/// 3rd and its loser 4th; without one both semi-final losers share 3rd.
pub fn final_placements(bracket: &Bracket) -> Vec<Placement> {
    let mut placements = Vec::new();
    let Some(final_match) = bracket.rounds().last().and_then(|r| r.first()) else {
        return placements;
    };

    let mut place = |position: u32, team_id: Option<TeamId>| {
        if let Some(team_id) = team_id {
            placements.push(Placement { position, team_id });
        }
    };
    place(1, final_match.winner);
    place(2, final_match.loser());

    match bracket.third_place() {
        Some(third) => {
            place(3, third.winner);
            place(4, third.loser());
        }
        None if bracket.total_rounds() >= 2 => {
            let semis = &bracket.rounds()[bracket.rounds().len() - 2];
            for semi in semis {
                place(3, semi.loser());
            }
        }
        None => {}
    }

    placements
}
