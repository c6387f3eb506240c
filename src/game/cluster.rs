//! Match detection - finding groups of connected same-colored bubbles.
//!
//! Uses an iterative flood fill (BFS) over a proximity relation: two
//! bubbles are neighbors when their centers are within a cell plus a
//! small epsilon, which tolerates the slight off-grid placement
//! snapping can produce. Groups of 3+ are scheduled to pop.

use bevy::prelude::*;
use std::collections::{HashSet, VecDeque};

use super::{
    bubble::{Bubble, BubbleColor},
    config::GameConfig,
    popper::Popping,
    projectile::{BubbleLanded, ProjectileSystems},
    state::GamePhase,
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<ClusterMatched>();

    // Landing spawns the settled bubble via deferred commands; flush
    // them so match detection can see it in the same frame.
    app.add_systems(
        Update,
        ApplyDeferred.after(ProjectileSystems).before(ClusterSystems),
    );

    app.add_systems(
        Update,
        detect_matches
            .in_set(ClusterSystems)
            .run_if(in_state(GamePhase::Shot)),
    );
}

/// System set for match detection systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterSystems;

/// Minimum group size to pop (match-3).
const MIN_MATCH_SIZE: usize = 3;

/// Message sent when a matched group is scheduled to pop.
///
/// The bubbles are not removed here; they keep their cells until the
/// pop animation completes and the popper prunes them.
#[derive(Message, Debug, Clone)]
pub struct ClusterMatched {
    pub bubbles: Vec<Entity>,
    pub color: BubbleColor,
    pub count: usize,
}

/// Run the flood fill from every freshly landed bubble.
fn detect_matches(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    bubble_query: Query<(Entity, &Bubble, &Transform), Without<Popping>>,
    mut landed_events: MessageReader<BubbleLanded>,
    mut matched_events: MessageWriter<ClusterMatched>,
) {
    for event in landed_events.read() {
        let Ok((_, _, origin_transform)) = bubble_query.get(event.entity) else {
            continue;
        };
        let origin_pos = origin_transform.translation.truncate();

        let candidates: Vec<(Entity, Vec2, BubbleColor)> = bubble_query
            .iter()
            .filter(|(entity, ..)| *entity != event.entity)
            .map(|(entity, bubble, transform)| {
                (entity, transform.translation.truncate(), bubble.color)
            })
            .collect();

        let group = find_matching_group(
            event.entity,
            origin_pos,
            event.color,
            &candidates,
            config.link_distance(),
        );

        if group.len() < MIN_MATCH_SIZE {
            continue;
        }

        info!(
            "matched group of {} {:?} bubbles at {}",
            group.len(),
            event.color,
            event.cell
        );

        // One shared start time for the whole set.
        let started = time.elapsed_secs();
        for &entity in &group {
            commands.entity(entity).insert(Popping { started });
        }

        matched_events.write(ClusterMatched {
            count: group.len(),
            bubbles: group,
            color: event.color,
        });
    }
}

/// Find all bubbles connected to the origin through same-colored
/// neighbors within `link_distance`, using an iterative BFS.
///
/// The origin is always part of the group (its color is known from the
/// landing event), and every bubble is visited at most once no matter
/// how many paths reach it.
pub fn find_matching_group(
    origin: Entity,
    origin_pos: Vec2,
    target_color: BubbleColor,
    bubbles: &[(Entity, Vec2, BubbleColor)],
    link_distance: f32,
) -> Vec<Entity> {
    let mut group = vec![origin];
    let mut visited: HashSet<Entity> = HashSet::from([origin]);
    let mut frontier: VecDeque<Vec2> = VecDeque::from([origin_pos]);

    while let Some(from) = frontier.pop_front() {
        for &(entity, position, color) in bubbles {
            if color != target_color || visited.contains(&entity) {
                continue;
            }
            if from.distance(position) <= link_distance {
                visited.insert(entity);
                group.push(entity);
                frontier.push_back(position);
            }
        }
    }

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::lattice::Cell;

    const CELL: f32 = 40.0;
    const LINK: f32 = 42.0;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    fn at(cell: Cell) -> Vec2 {
        cell.center(CELL)
    }

    #[test]
    fn test_lone_origin_matches_only_itself() {
        let es = entities(2);
        // Same color two cells away: out of link range.
        let far = vec![(es[1], at(Cell::new(5, 3)), BubbleColor::Red)];
        let group = find_matching_group(es[0], at(Cell::new(5, 1)), BubbleColor::Red, &far, LINK);
        assert_eq!(group, vec![es[0]]);
    }

    #[test]
    fn test_other_colors_are_excluded() {
        let es = entities(3);
        let candidates = vec![
            (es[1], at(Cell::new(5, 1)), BubbleColor::Blue),
            (es[2], at(Cell::new(6, 0)), BubbleColor::Red),
        ];
        let group =
            find_matching_group(es[0], at(Cell::new(5, 0)), BubbleColor::Red, &candidates, LINK);
        assert_eq!(group.len(), 2);
        assert!(group.contains(&es[0]));
        assert!(group.contains(&es[2]));
    }

    #[test]
    fn test_diagonals_are_not_neighbors() {
        let es = entities(2);
        let diagonal = vec![(es[1], at(Cell::new(6, 1)), BubbleColor::Red)];
        let group =
            find_matching_group(es[0], at(Cell::new(5, 0)), BubbleColor::Red, &diagonal, LINK);
        assert_eq!(group, vec![es[0]]);
    }

    #[test]
    fn test_l_shape_plus_landing_matches_four() {
        let es = entities(4);
        let candidates = vec![
            (es[1], at(Cell::new(4, 0)), BubbleColor::Green),
            (es[2], at(Cell::new(4, 1)), BubbleColor::Green),
            (es[3], at(Cell::new(5, 0)), BubbleColor::Green),
        ];
        // Landing below the foot of the L.
        let group = find_matching_group(
            es[0],
            at(Cell::new(4, 2)),
            BubbleColor::Green,
            &candidates,
            LINK,
        );
        assert_eq!(group.len(), 4);
    }

    #[test]
    fn test_cycle_visits_each_bubble_once() {
        let es = entities(4);
        // A 2x2 block is a cycle in the adjacency graph.
        let candidates = vec![
            (es[1], at(Cell::new(6, 0)), BubbleColor::Yellow),
            (es[2], at(Cell::new(5, 1)), BubbleColor::Yellow),
            (es[3], at(Cell::new(6, 1)), BubbleColor::Yellow),
        ];
        let group = find_matching_group(
            es[0],
            at(Cell::new(5, 0)),
            BubbleColor::Yellow,
            &candidates,
            LINK,
        );
        assert_eq!(group.len(), 4);
        let unique: HashSet<_> = group.iter().collect();
        assert_eq!(unique.len(), 4);
    }
}
