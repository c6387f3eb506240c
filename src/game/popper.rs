//! The pop lifecycle - timed shrink/fade until matched bubbles are prunable.
//!
//! Progress is eased on elapsed wall-clock time rather than per-frame
//! decrements, so the animation is resilient to variable frame rates.
//! Bubbles are only removed from the grid, and the pop counter only
//! advances, once the whole set reaches full progress.

use bevy::prelude::*;

use super::{bubble::Bubble, config::GameConfig, grid::Grid, state::playing};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Popping>();
    app.add_message::<BubblesPruned>();

    app.add_systems(Update, advance_pops.in_set(PopSystems).run_if(playing));
}

/// System set for pop lifecycle systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PopSystems;

/// Message sent when a matched set finishes its pop animation and is
/// pruned from the grid. Drives the pop counter and the win rule.
#[derive(Message, Debug, Clone)]
pub struct BubblesPruned {
    pub count: u32,
}

/// A bubble mid-pop. All bubbles of one matched set share a start time.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Popping {
    /// `Time::elapsed_secs` when the set was scheduled.
    pub started: f32,
}

impl Popping {
    /// Animation progress in `[0, 1]`.
    pub fn progress(&self, now: f32, duration_secs: f32) -> f32 {
        if duration_secs <= 0.0 {
            return 1.0;
        }
        ((now - self.started) / duration_secs).clamp(0.0, 1.0)
    }
}

/// Prune bubbles whose pop animation has completed.
///
/// A matched set shares one start time, so the whole set is pruned in a
/// single pass here and reported as one count.
fn advance_pops(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    query: Query<(Entity, &Bubble, &Popping)>,
    mut pruned_events: MessageWriter<BubblesPruned>,
) {
    let now = time.elapsed_secs();
    let mut count = 0u32;

    for (entity, bubble, popping) in &query {
        if popping.progress(now, config.pop_duration_secs) >= 1.0 {
            grid.remove(bubble.cell);
            commands.entity(entity).despawn();
            count += 1;
        }
    }

    if count > 0 {
        info!("pruned {} popped bubbles", count);
        pruned_events.write(BubblesPruned { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamps_to_unit_interval() {
        let popping = Popping { started: 10.0 };
        assert_eq!(popping.progress(9.0, 0.3), 0.0);
        assert_eq!(popping.progress(10.15, 0.3), 0.5);
        assert_eq!(popping.progress(12.0, 0.3), 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let popping = Popping { started: 5.0 };
        assert_eq!(popping.progress(5.0, 0.0), 1.0);
    }
}
