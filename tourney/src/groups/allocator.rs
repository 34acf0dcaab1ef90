//! Balanced group allocation.

use std::collections::HashSet;

use crate::draw::DrawSource;
use crate::errors::{EngineError, EngineResult};
use crate::models::{Group, TeamId};

/// Group labels in allocation order
pub const GROUP_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Split teams into balanced, labelled groups
///
/// The number of groups is `ceil(n / teams_per_group)`, capped at `max_groups`
/// (itself capped at 8). Teams are shuffled with `draw` and dealt out one at a
/// time, so group sizes differ by at most one.
///
/// # Errors
///
/// * `NoTeams` for an empty roster
/// * `InvalidSettings` when `teams_per_group` or `max_groups` is zero
/// * `DuplicateTeam` when a team id repeats
pub fn allocate_groups(
    team_ids: &[TeamId],
    teams_per_group: usize,
    max_groups: usize,
    draw: &mut dyn DrawSource,
) -> EngineResult<Vec<Group>> {
    if team_ids.is_empty() {
        return Err(EngineError::NoTeams);
    }
    if teams_per_group == 0 {
        return Err(EngineError::InvalidSettings(
            "teams per group must be at least 1".to_string(),
        ));
    }
    if max_groups == 0 {
        return Err(EngineError::InvalidSettings(
            "at least one group is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(team_ids.len());
    for &team_id in team_ids {
        if !seen.insert(team_id) {
            return Err(EngineError::DuplicateTeam(team_id));
        }
    }

    let number_of_groups = team_ids
        .len()
        .div_ceil(teams_per_group)
        .min(max_groups)
        .min(GROUP_LABELS.len());

    let mut shuffled = team_ids.to_vec();
    draw.shuffle(&mut shuffled);

    let mut groups: Vec<Group> = GROUP_LABELS[..number_of_groups]
        .iter()
        .map(|&label| Group::new(label))
        .collect();

    for (i, team_id) in shuffled.into_iter().enumerate() {
        groups[i % number_of_groups].team_ids.push(team_id);
    }

    log::debug!(
        "Allocated {} teams into {} groups of up to {}",
        team_ids.len(),
        number_of_groups,
        teams_per_group
    );

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawRandomizer, OrderedDraw};

    #[test]
    fn test_five_teams_three_per_group() {
        let groups =
            allocate_groups(&[1, 2, 3, 4, 5], 3, 8, &mut DrawRandomizer::seeded(1)).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, 'A');
        assert_eq!(groups[1].label, 'B');
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_round_robin_dealing() {
        let groups =
            allocate_groups(&[1, 2, 3, 4, 5, 6], 3, 8, &mut OrderedDraw::default()).unwrap();
        assert_eq!(groups[0].team_ids, vec![1, 3, 5]);
        assert_eq!(groups[1].team_ids, vec![2, 4, 6]);
    }

    #[test]
    fn test_group_cap() {
        let teams: Vec<TeamId> = (1..=40).collect();
        let groups = allocate_groups(&teams, 2, 8, &mut OrderedDraw::default()).unwrap();
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[7].label, 'H');
        assert!(groups.iter().all(|g| g.len() == 5));
    }

    #[test]
    fn test_configured_cap_below_eight() {
        let teams: Vec<TeamId> = (1..=9).collect();
        let groups = allocate_groups(&teams, 2, 3, &mut OrderedDraw::default()).unwrap();
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_single_team() {
        let groups = allocate_groups(&[7], 4, 8, &mut OrderedDraw::default()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].team_ids, vec![7]);
    }

    #[test]
    fn test_errors() {
        let mut draw = OrderedDraw::default();
        assert!(matches!(
            allocate_groups(&[], 4, 8, &mut draw),
            Err(EngineError::NoTeams)
        ));
        assert!(matches!(
            allocate_groups(&[1, 2], 0, 8, &mut draw),
            Err(EngineError::InvalidSettings(_))
        ));
        assert!(matches!(
            allocate_groups(&[1, 2, 1], 2, 8, &mut draw),
            Err(EngineError::DuplicateTeam(1))
        ));
    }
}
