//! Elimination bracket construction.

use std::collections::HashSet;

use super::Bracket;
use crate::draw::DrawSource;
use crate::errors::{EngineError, EngineResult};
use crate::models::{BracketSlot, Fixture, FixtureStatus, RoundTag, TeamId, Tournament};

/// Build a single-elimination bracket from `team_ids`
///
/// Entrants are shuffled and paired in order. With an odd count the last
/// entrant gets a bye: its round-one fixture is a walkover and the winner is
/// seated in round two straight away. Each later round has half as many
/// fixtures as the one before it, rounded up, for `ceil(log2(n))` rounds.
///
/// # Errors
///
/// * `NotEnoughTeams` with fewer than two entrants
/// * `DuplicateTeam` if an entrant is listed twice
pub fn build_bracket(
    tournament: &Tournament,
    team_ids: &[TeamId],
    draw: &mut dyn DrawSource,
) -> EngineResult<Bracket> {
    if team_ids.len() < 2 {
        return Err(EngineError::NotEnoughTeams {
            needed: 2,
            current: team_ids.len(),
        });
    }

    let mut seen = HashSet::with_capacity(team_ids.len());
    for &team_id in team_ids {
        if !seen.insert(team_id) {
            return Err(EngineError::DuplicateTeam(team_id));
        }
    }

    let mut entrants = team_ids.to_vec();
    draw.shuffle(&mut entrants);

    let total_rounds = entrants.len().next_power_of_two().trailing_zeros();
    let next_of = |slot: BracketSlot| (slot.round < total_rounds).then(|| slot.successor());

    let mut byes = Vec::new();
    let first_round: Vec<Fixture> = entrants
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| {
            let slot = BracketSlot::new(1, index as u32);
            let mut fixture = Fixture::bracket_match(
                tournament.id,
                RoundTag::for_bracket_round(1, total_rounds),
                Some(slot),
                next_of(slot),
            );
            fixture.team1 = Some(pair[0]);
            match pair.get(1) {
                Some(&team2) => {
                    fixture.team2 = Some(team2);
                    fixture.status = FixtureStatus::Scheduled;
                }
                None => {
                    fixture.award_walkover(pair[0]);
                    byes.push(slot);
                }
            }
            fixture
        })
        .collect();

    let mut rounds = vec![first_round];
    for round in 2..=total_rounds {
        let count = rounds.last().map_or(0, Vec::len).div_ceil(2);
        let fixtures = (0..count)
            .map(|index| {
                let slot = BracketSlot::new(round, index as u32);
                Fixture::bracket_match(
                    tournament.id,
                    RoundTag::for_bracket_round(round, total_rounds),
                    Some(slot),
                    next_of(slot),
                )
            })
            .collect();
        rounds.push(fixtures);
    }

    let third_place = (tournament.third_place_match && total_rounds >= 2)
        .then(|| Fixture::bracket_match(tournament.id, RoundTag::ThirdPlace, None, None));

    let mut bracket = Bracket::new(rounds, third_place);
    for slot in byes {
        bracket.advance(slot)?;
    }
    bracket.settle_third_place();

    log::info!(
        "Built {}-round bracket for tournament {} with {} teams",
        total_rounds,
        tournament.id,
        entrants.len()
    );

    Ok(bracket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawRandomizer, OrderedDraw};
    use crate::models::{Format, Sport};

    fn tournament() -> Tournament {
        Tournament::new(1, "Knockout", Sport::Soccer, Format::Elimination)
    }

    fn build(teams: &[TeamId]) -> Bracket {
        build_bracket(&tournament(), teams, &mut OrderedDraw::default()).unwrap()
    }

    #[test]
    fn test_power_of_two() {
        let bracket = build(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let sizes: Vec<usize> = bracket.rounds().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 2, 1]);
        assert!(
            bracket.rounds()[0]
                .iter()
                .all(|f| f.status == FixtureStatus::Scheduled)
        );
        assert!(
            bracket.rounds()[1]
                .iter()
                .all(|f| f.status == FixtureStatus::Pending && f.team1.is_none())
        );
        assert_eq!(bracket.rounds()[0][0].round, RoundTag::QuarterFinals);
        assert_eq!(bracket.rounds()[2][0].round, RoundTag::Final);
        assert_eq!(bracket.rounds()[2][0].next_slot, None);
        assert_eq!(
            bracket.rounds()[0][3].next_slot,
            Some(BracketSlot::new(2, 1))
        );
    }

    #[test]
    fn test_five_teams_bye() {
        let bracket = build(&[1, 2, 3, 4, 5]);
        assert_eq!(bracket.total_rounds(), 3);

        let first = &bracket.rounds()[0];
        let real = first.iter().filter(|f| f.has_both_teams()).count();
        assert_eq!(real, 2);
        assert_eq!(first[2].status, FixtureStatus::Walkover);
        assert_eq!(first[2].winner, Some(5));

        // bye winner seated in round two, passing through its single-feeder fixture
        let second = &bracket.rounds()[1];
        assert_eq!(second[1].team1, Some(5));
        assert_eq!(second[1].status, FixtureStatus::Walkover);
        assert_eq!(second[0].status, FixtureStatus::Pending);

        let final_match = &bracket.rounds()[2][0];
        assert_eq!(final_match.team1, Some(5));
        assert_eq!(final_match.team2, None);
        assert_eq!(final_match.status, FixtureStatus::Pending);
    }

    #[test]
    fn test_two_teams_is_a_final() {
        let bracket = build(&[7, 9]);
        assert_eq!(bracket.total_rounds(), 1);
        let final_match = &bracket.rounds()[0][0];
        assert_eq!(final_match.round, RoundTag::Final);
        assert_eq!(final_match.status, FixtureStatus::Scheduled);
        assert_eq!(final_match.next_slot, None);
    }

    #[test]
    fn test_three_teams() {
        let bracket = build(&[1, 2, 3]);
        let sizes: Vec<usize> = bracket.rounds().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(bracket.rounds()[1][0].team1, Some(3));
    }

    #[test]
    fn test_third_place_fixture() {
        let with = Tournament {
            third_place_match: true,
            ..tournament()
        };
        let bracket = build_bracket(&with, &[1, 2, 3, 4], &mut OrderedDraw::default()).unwrap();
        let third = bracket.third_place().unwrap();
        assert_eq!(third.round, RoundTag::ThirdPlace);
        assert_eq!(third.status, FixtureStatus::Pending);

        let bracket = build_bracket(&with, &[1, 2], &mut OrderedDraw::default()).unwrap();
        assert!(bracket.third_place().is_none());
    }

    #[test]
    fn test_rejects_bad_rosters() {
        let err = build_bracket(&tournament(), &[1], &mut OrderedDraw::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotEnoughTeams {
                needed: 2,
                current: 1
            }
        ));
        let err = build_bracket(&tournament(), &[1, 2, 1], &mut OrderedDraw::default()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateTeam(1)));
    }

    #[test]
    fn test_seeded_draw_is_reproducible() {
        let teams: Vec<TeamId> = (1..=12).collect();
        let a = build_bracket(&tournament(), &teams, &mut DrawRandomizer::seeded(11)).unwrap();
        let b = build_bracket(&tournament(), &teams, &mut DrawRandomizer::seeded(11)).unwrap();
        assert_eq!(a.rounds()[0], b.rounds()[0]);
    }
}
