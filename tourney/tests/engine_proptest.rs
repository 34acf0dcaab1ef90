/// Property-based tests for group generation, standings and brackets
///
/// These tests check the structural guarantees of the engine across
/// randomly sized rosters and randomly drawn results.
use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use tourney::bracket::{Bracket, build_bracket};
use tourney::draw::DrawRandomizer;
use tourney::groups::{allocate_groups, schedule_group};
use tourney::models::{
    Fixture, FixtureStatus, Format, GameScore, Group, Legs, Sport, TeamId, Tournament,
};
use tourney::rules::{GoalBased, SportRules};
use tourney::standings::group_table;

// Strategy for a roster of distinct team ids
fn roster_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<TeamId>> {
    (min..=max).prop_map(|n| (1..=n as TeamId).collect())
}

fn legs_strategy() -> impl Strategy<Value = Legs> {
    prop_oneof![Just(Legs::Single), Just(Legs::Double)]
}

// Give every bracket fixture a distinct id, as the repository would
fn numbered(bracket: Bracket) -> Bracket {
    let fixtures: Vec<Fixture> = bracket
        .into_fixtures()
        .into_iter()
        .enumerate()
        .map(|(i, mut f)| {
            f.id = i as i64 + 1;
            f
        })
        .collect();
    Bracket::from_fixtures(fixtures).unwrap()
}

proptest! {
    #[test]
    fn test_allocation_covers_roster(
        teams in roster_strategy(1, 64),
        per_group in 1usize..=8,
        max_groups in 1usize..=8,
        seed in any::<u64>(),
    ) {
        let groups = allocate_groups(&teams, per_group, max_groups, &mut DrawRandomizer::seeded(seed)).unwrap();

        let expected = teams.len().div_ceil(per_group).min(max_groups);
        prop_assert_eq!(groups.len(), expected);

        let mut seen: Vec<TeamId> = groups.iter().flat_map(|g| g.team_ids.clone()).collect();
        seen.sort();
        prop_assert_eq!(seen, teams, "every team lands in exactly one group");

        let largest = groups.iter().map(Group::len).max().unwrap();
        let smallest = groups.iter().map(Group::len).min().unwrap();
        prop_assert!(largest - smallest <= 1, "group sizes differ by at most one");
    }

    #[test]
    fn test_round_robin_shape(teams in roster_strategy(2, 10), legs in legs_strategy()) {
        let k = teams.len();
        let group = Group { label: 'A', team_ids: teams };
        let fixtures = schedule_group(1, &group, legs);

        let per_leg = k * (k - 1) / 2;
        let leg_count = if legs == Legs::Double { 2 } else { 1 };
        prop_assert_eq!(fixtures.len(), per_leg * leg_count);

        // every unordered pair meets once per leg
        let mut meetings: HashMap<(TeamId, TeamId), usize> = HashMap::new();
        for f in &fixtures {
            let (a, b) = (f.team1.unwrap(), f.team2.unwrap());
            prop_assert_ne!(a, b);
            *meetings.entry((a.min(b), a.max(b))).or_default() += 1;
        }
        prop_assert_eq!(meetings.len(), per_leg);
        prop_assert!(meetings.values().all(|&count| count == leg_count));

        // nobody plays twice on a matchday
        let mut busy: HashSet<(u32, TeamId)> = HashSet::new();
        for f in &fixtures {
            let day = f.matchday.unwrap();
            prop_assert!(day >= 1);
            prop_assert!(busy.insert((day, f.team1.unwrap())));
            prop_assert!(busy.insert((day, f.team2.unwrap())));
        }

        let last_day = fixtures.iter().filter_map(|f| f.matchday).max().unwrap();
        prop_assert!(last_day as usize <= k * leg_count);
    }

    #[test]
    fn test_standings_account_for_every_result(
        teams in roster_strategy(2, 6),
        scores in prop::collection::vec((0u32..5, 0u32..5, any::<bool>()), 30),
    ) {
        let rules: SportRules = GoalBased::default().into();
        let group = Group { label: 'A', team_ids: teams.clone() };
        let mut fixtures = schedule_group(1, &group, Legs::Single);

        let mut completed = 0u32;
        for (fixture, &(s1, s2, played)) in fixtures.iter_mut().zip(&scores) {
            if played {
                tourney::bracket::record_match(fixture, &GameScore::new(s1, s2), &rules).unwrap();
                completed += 1;
            }
        }

        let table = group_table(&group, &fixtures, &rules);
        prop_assert_eq!(table.rows.len(), teams.len());

        for row in &table.rows {
            prop_assert_eq!(row.wins + row.draws + row.losses, row.played);
            prop_assert_eq!(row.points, row.wins * 3 + row.draws);
        }

        let played: u32 = table.rows.iter().map(|r| r.played).sum();
        prop_assert_eq!(played, completed * 2);

        let wins: u32 = table.rows.iter().map(|r| r.wins).sum();
        let losses: u32 = table.rows.iter().map(|r| r.losses).sum();
        prop_assert_eq!(wins, losses);

        let scored: u32 = table.rows.iter().map(|r| r.scored_for).sum();
        let conceded: u32 = table.rows.iter().map(|r| r.scored_against).sum();
        prop_assert_eq!(scored, conceded);

        prop_assert!(table.rows.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn test_bracket_shape(teams in roster_strategy(2, 40), seed in any::<u64>()) {
        let n = teams.len();
        let tournament = Tournament::new(1, "Cup", Sport::Soccer, Format::Elimination)
            .with_teams(teams.clone());
        let bracket = build_bracket(&tournament, &teams, &mut DrawRandomizer::seeded(seed)).unwrap();

        let expected_rounds = n.next_power_of_two().trailing_zeros();
        prop_assert_eq!(bracket.total_rounds(), expected_rounds);
        prop_assert_eq!(bracket.rounds()[0].len(), n.div_ceil(2));
        prop_assert_eq!(bracket.rounds().last().unwrap().len(), 1);

        for round in bracket.rounds() {
            for fixture in round {
                let slot = fixture.slot.unwrap();
                match fixture.next_slot {
                    Some(next) => {
                        prop_assert!(bracket.fixture(next).is_some());
                    }
                    None => {
                        prop_assert_eq!(slot.round, expected_rounds);
                    }
                }
            }
        }

        let mut seated: Vec<TeamId> = bracket.rounds()[0]
            .iter()
            .flat_map(|f| [f.team1, f.team2])
            .flatten()
            .collect();
        seated.sort();
        prop_assert_eq!(seated, teams);
    }

    #[test]
    fn test_bracket_plays_out(teams in roster_strategy(2, 24), seed in any::<u64>(), upsets in any::<u64>()) {
        let n = teams.len();
        let rules: SportRules = GoalBased::default().into();
        let tournament = Tournament::new(1, "Cup", Sport::Soccer, Format::Elimination)
            .with_teams(teams.clone());
        let mut bracket = numbered(
            build_bracket(&tournament, &teams, &mut DrawRandomizer::seeded(seed)).unwrap(),
        );

        let mut played = 0u32;
        for round in 0..bracket.rounds().len() {
            let ready: Vec<i64> = bracket.rounds()[round]
                .iter()
                .filter(|f| f.status == FixtureStatus::Scheduled)
                .map(|f| f.id)
                .collect();
            for id in ready {
                let result = if (upsets >> (played % 64)) & 1 == 1 {
                    GameScore::new(0, 1)
                } else {
                    GameScore::new(2, 1)
                };
                bracket.apply_match(id, &result, &rules).unwrap();
                played += 1;
            }
        }

        prop_assert!(bracket.champion().is_some());
        prop_assert!(bracket.fixtures().all(|f| f.winner.is_some()));

        // each contested fixture eliminates exactly one team
        let contested = bracket
            .rounds()
            .iter()
            .flatten()
            .filter(|f| f.has_both_teams())
            .count();
        prop_assert_eq!(contested, n - 1);
    }
}
