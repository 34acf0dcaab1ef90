//! Round-robin fixtures and matchday assignment.

use std::collections::HashSet;

use crate::models::{Fixture, Group, Legs, TeamId, TournamentId};

/// Every pairing of a group, in circle-method order
///
/// Each circle round lists pairings with no team repeated, so feeding the
/// result to [`assign_matchdays`] yields k-1 matchdays for an even group and k
/// for an odd one. With [`Legs::Double`] the return legs follow, reversed.
pub fn round_robin_pairings(team_ids: &[TeamId], legs: Legs) -> Vec<(TeamId, TeamId)> {
    let mut ring: Vec<Option<TeamId>> = team_ids.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None); // bye
    }

    let n = ring.len();
    let mut pairings = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    if n < 2 {
        return pairings;
    }

    for round in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (ring[i], ring[n - 1 - i]) {
                // alternate the fixed team's side
                if i == 0 && round % 2 == 1 {
                    pairings.push((b, a));
                } else {
                    pairings.push((a, b));
                }
            }
        }
        ring[1..].rotate_right(1);
    }

    if legs == Legs::Double {
        let return_legs: Vec<_> = pairings.iter().map(|&(a, b)| (b, a)).collect();
        pairings.extend(return_legs);
    }

    pairings
}

/// Assign 1-indexed matchdays with a greedy first-fit pass
///
/// Remaining pairings are scanned in order; a pairing joins the current
/// matchday when neither team already plays that day, and a new matchday is
/// opened once nothing else fits. The returned vector is parallel to `pairings`.
pub fn assign_matchdays(pairings: &[(TeamId, TeamId)]) -> Vec<u32> {
    let mut matchdays = vec![0; pairings.len()];
    let mut remaining: Vec<usize> = (0..pairings.len()).collect();
    let mut day = 0;

    while !remaining.is_empty() {
        day += 1;
        let mut busy: HashSet<TeamId> = HashSet::new();
        remaining.retain(|&i| {
            let (a, b) = pairings[i];
            if busy.contains(&a) || busy.contains(&b) {
                return true;
            }
            busy.insert(a);
            busy.insert(b);
            matchdays[i] = day;
            false
        });
    }

    matchdays
}

/// Build the scheduled fixtures of one group
pub fn schedule_group(tournament_id: TournamentId, group: &Group, legs: Legs) -> Vec<Fixture> {
    let pairings = round_robin_pairings(&group.team_ids, legs);
    let matchdays = assign_matchdays(&pairings);

    pairings
        .into_iter()
        .zip(matchdays)
        .map(|((team1, team2), matchday)| {
            Fixture::group_match(tournament_id, group.label, team1, team2, matchday)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn group(label: char, teams: &[TeamId]) -> Group {
        Group {
            label,
            team_ids: teams.to_vec(),
        }
    }

    fn assert_exclusive(fixtures: &[Fixture]) {
        let mut seen: HashMap<u32, HashSet<TeamId>> = HashMap::new();
        for f in fixtures {
            let day = seen.entry(f.matchday.unwrap()).or_default();
            assert!(day.insert(f.team1.unwrap()), "team twice on a matchday");
            assert!(day.insert(f.team2.unwrap()), "team twice on a matchday");
        }
    }

    #[test]
    fn test_group_of_four_single() {
        let fixtures = schedule_group(1, &group('A', &[1, 2, 3, 4]), Legs::Single);
        assert_eq!(fixtures.len(), 6);
        assert_exclusive(&fixtures);

        let days: HashSet<u32> = fixtures.iter().filter_map(|f| f.matchday).collect();
        assert_eq!(days.len(), 3);
        assert!(fixtures.iter().all(|f| f.group == Some('A')));
    }

    #[test]
    fn test_group_of_five_single() {
        let fixtures = schedule_group(1, &group('B', &[1, 2, 3, 4, 5]), Legs::Single);
        assert_eq!(fixtures.len(), 10);
        assert_exclusive(&fixtures);
        let max_day = fixtures.iter().filter_map(|f| f.matchday).max().unwrap();
        assert_eq!(max_day, 5);
    }

    #[test]
    fn test_double_round_robin() {
        let fixtures = schedule_group(1, &group('A', &[1, 2, 3, 4]), Legs::Double);
        assert_eq!(fixtures.len(), 12);
        assert_exclusive(&fixtures);

        // every ordered pair exactly once
        let ordered: HashSet<(TeamId, TeamId)> = fixtures
            .iter()
            .map(|f| (f.team1.unwrap(), f.team2.unwrap()))
            .collect();
        assert_eq!(ordered.len(), 12);
    }

    #[test]
    fn test_every_pair_meets_once() {
        let pairings = round_robin_pairings(&[10, 20, 30, 40, 50, 60], Legs::Single);
        let unordered: HashSet<(TeamId, TeamId)> = pairings
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();
        assert_eq!(unordered.len(), 15);
    }

    #[test]
    fn test_tiny_groups() {
        assert!(round_robin_pairings(&[], Legs::Single).is_empty());
        assert!(round_robin_pairings(&[1], Legs::Double).is_empty());
        assert_eq!(round_robin_pairings(&[1, 2], Legs::Double), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_greedy_opens_new_matchday() {
        let matchdays = assign_matchdays(&[(1, 2), (2, 3), (3, 4), (1, 4)]);
        assert_eq!(matchdays, vec![1, 2, 1, 2]);
    }
}
