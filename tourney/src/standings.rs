//! Group standings derived from fixture state.
//!
//! Standings are never stored; they are folded from completed fixtures on
//! demand. Ranking order:
//!
//! 1. points, descending
//! 2. goal (or set) differential, descending
//! 3. goals (or sets) scored, descending
//! 4. the direct meeting between two tied teams, if it was completed
//!
//! Step 4 only compares neighbouring pairs, so a three-way tie with a cyclic
//! head-to-head keeps whatever order steps 1-3 left it in.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Fixture, FixtureStatus, Group, GroupLabel, TeamId};
use crate::rules::{ScoringRules, SportRules};

/// One team's line in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Goals, or sets won
    pub scored_for: u32,
    /// Goals, or sets lost
    pub scored_against: u32,
    pub points: u32,
}

impl StandingRow {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            scored_for: 0,
            scored_against: 0,
            points: 0,
        }
    }

    pub fn differential(&self) -> i64 {
        i64::from(self.scored_for) - i64::from(self.scored_against)
    }

    fn record(&mut self, scored: u32, conceded: u32, points: u32) {
        self.played += 1;
        self.scored_for += scored;
        self.scored_against += conceded;
        self.points += points;
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.draws += 1,
        }
    }
}

/// Ranked table of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTable {
    pub group: GroupLabel,
    pub rows: Vec<StandingRow>,
}

/// Rank every team that appears in `fixtures`
pub fn compute_standings(fixtures: &[Fixture], rules: &SportRules) -> Vec<StandingRow> {
    tabulate(&[], fixtures, rules)
}

/// Ranked table for `group`, including members that have not played yet
pub fn group_table(group: &Group, fixtures: &[Fixture], rules: &SportRules) -> GroupTable {
    let own: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| f.group == Some(group.label))
        .cloned()
        .collect();

    GroupTable {
        group: group.label,
        rows: tabulate(&group.team_ids, &own, rules),
    }
}

/// Top `per_group` teams of each table, interleaved by rank
///
/// All group winners come first (in group order), then all runners-up, and so on.
pub fn select_qualifiers(tables: &[GroupTable], per_group: usize) -> Vec<TeamId> {
    let mut qualifiers = Vec::with_capacity(tables.len() * per_group);
    for rank in 0..per_group {
        for table in tables {
            if let Some(row) = table.rows.get(rank) {
                qualifiers.push(row.team_id);
            }
        }
    }
    qualifiers
}

fn tabulate(seed: &[TeamId], fixtures: &[Fixture], rules: &SportRules) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = Vec::new();
    let mut index: HashMap<TeamId, usize> = HashMap::new();

    let mut row_for = |team_id: TeamId, rows: &mut Vec<StandingRow>| -> usize {
        *index.entry(team_id).or_insert_with(|| {
            rows.push(StandingRow::new(team_id));
            rows.len() - 1
        })
    };

    for &team_id in seed {
        row_for(team_id, &mut rows);
    }

    for fixture in fixtures {
        let (Some(team1), Some(team2)) = (fixture.team1, fixture.team2) else {
            continue;
        };
        let i1 = row_for(team1, &mut rows);
        let i2 = row_for(team2, &mut rows);

        if fixture.status != FixtureStatus::Completed {
            continue;
        }
        let (Some(score1), Some(score2)) = (fixture.score1, fixture.score2) else {
            continue;
        };

        let (points1, points2) = rules.award_points(score1, score2);
        rows[i1].record(score1, score2, points1);
        rows[i2].record(score2, score1, points2);
    }

    rank(&mut rows, fixtures);
    rows
}

fn compare_totals(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.differential().cmp(&a.differential()))
        .then_with(|| b.scored_for.cmp(&a.scored_for))
}

/// Result of the first completed meeting between `a` and `b`
fn head_to_head(fixtures: &[Fixture], a: TeamId, b: TeamId) -> Ordering {
    let meeting = fixtures.iter().find(|f| {
        f.status == FixtureStatus::Completed && f.involves(a) && f.involves(b)
    });

    match meeting.and_then(|f| f.winner) {
        Some(winner) if winner == a => Ordering::Less,
        Some(winner) if winner == b => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn rank(rows: &mut [StandingRow], fixtures: &[Fixture]) {
    rows.sort_by(compare_totals);

    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && compare_totals(&rows[start], &rows[end]) == Ordering::Equal {
            end += 1;
        }

        // insertion sort tolerates a cyclic head-to-head
        let tied = &mut rows[start..end];
        for i in 1..tied.len() {
            let mut j = i;
            while j > 0
                && head_to_head(fixtures, tied[j].team_id, tied[j - 1].team_id) == Ordering::Less
            {
                tied.swap(j, j - 1);
                j -= 1;
            }
        }

        start = end;
    }
}
