//! Projectile - the bubble being shot.
//!
//! The projectile travels in a straight line, bouncing off the side
//! walls and the ceiling, until it strikes a settled bubble and snaps
//! into the grid, or drops off the bottom of the field for a miss.
//! None of this runs outside the Shot phase.

use bevy::prelude::*;

use super::{
    bubble::{spawn_bubble, Bubble, BubbleColor},
    config::GameConfig,
    grid::Grid,
    lattice::Cell,
    popper::Popping,
    state::GamePhase,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>();
    app.add_message::<FireProjectile>();
    app.add_message::<BubbleLanded>();

    app.add_systems(
        Update,
        (
            spawn_projectile,
            integrate_projectile,
            check_grid_collision,
            check_missed_exit,
        )
            .chain()
            .in_set(ProjectileSystems)
            .run_if(in_state(GamePhase::Shot)),
    );
}

/// System set for projectile systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectileSystems;

/// Message to launch a projectile. Written on pointer release; the
/// launch position is the configured spawn point.
#[derive(Message, Debug, Clone)]
pub struct FireProjectile {
    pub velocity: Vec2,
    pub color: BubbleColor,
}

/// Message sent when a projectile settles into the grid.
/// Triggers match detection.
#[derive(Message, Debug, Clone)]
pub struct BubbleLanded {
    pub entity: Entity,
    pub cell: Cell,
    pub color: BubbleColor,
}

/// The single in-flight shot bubble.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    /// Current velocity in pixels per second.
    pub velocity: Vec2,
    /// The bubble color.
    pub color: BubbleColor,
}

/// Spawn the projectile when the fire message arrives.
fn spawn_projectile(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut fire_events: MessageReader<FireProjectile>,
    existing: Query<(), With<Projectile>>,
) {
    for event in fire_events.read() {
        // At most one projectile exists at a time.
        if !existing.is_empty() {
            continue;
        }

        commands.spawn((
            Name::new("Projectile"),
            Projectile {
                velocity: event.velocity,
                color: event.color,
            },
            Transform::from_translation(config.spawn_point().extend(0.0)),
            DespawnOnExit(GamePhase::Shot),
        ));

        info!(
            "spawned {:?} projectile with velocity {:?}",
            event.color, event.velocity
        );
    }
}

/// Advance the projectile and reflect it off the walls and ceiling.
///
/// The ceiling bounces rather than landing; settling only ever happens
/// against the grid.
fn integrate_projectile(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(&mut Transform, &mut Projectile)>,
) {
    let dt = time.delta_secs();
    let half = config.cell_size / 2.0;

    for (mut transform, mut projectile) in &mut query {
        transform.translation += (projectile.velocity * dt).extend(0.0);

        if transform.translation.x < half {
            transform.translation.x = half;
            projectile.velocity.x = projectile.velocity.x.abs();
        }
        if transform.translation.x > config.canvas_width - half {
            transform.translation.x = config.canvas_width - half;
            projectile.velocity.x = -projectile.velocity.x.abs();
        }
        if transform.translation.y < half {
            transform.translation.y = half;
            projectile.velocity.y = projectile.velocity.y.abs();
        }
    }
}

/// Land the projectile when it gets close enough to a settled bubble.
fn check_grid_collision(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    projectile_query: Query<(Entity, &Transform, &Projectile)>,
    settled_query: Query<&Transform, (With<Bubble>, Without<Popping>, Without<Projectile>)>,
    mut landed_events: MessageWriter<BubbleLanded>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    // First pass: find the nearest settled bubble within hit range.
    let mut hit: Option<(Entity, Vec2, BubbleColor)> = None;

    for (proj_entity, proj_transform, projectile) in &projectile_query {
        let proj_pos = proj_transform.translation.truncate();
        let mut nearest = config.hit_distance();

        for (_cell, &bubble_entity) in grid.iter() {
            let Ok(bubble_transform) = settled_query.get(bubble_entity) else {
                // Popping bubbles no longer block flight.
                continue;
            };

            let distance = proj_pos.distance(bubble_transform.translation.truncate());
            if distance < nearest {
                nearest = distance;
                hit = Some((proj_entity, proj_pos, projectile.color));
            }
        }
    }

    // Second pass: settle it, now that the grid can be borrowed mutably.
    let Some((proj_entity, proj_pos, color)) = hit else {
        return;
    };

    commands.entity(proj_entity).despawn();
    next_phase.set(GamePhase::Aiming);

    match grid.closest_free_cell(proj_pos, &config) {
        Some(cell) => {
            let new_entity = spawn_bubble(&mut commands, &config, cell, color);
            grid.insert(cell, new_entity);
            landed_events.write(BubbleLanded {
                entity: new_entity,
                cell,
                color,
            });
            info!("bubble landed at {} with color {:?}", cell, color);
        }
        None => {
            // The grid is packed solid around the impact point; treat
            // the shot as a miss rather than overwrite a cell.
            warn!("no free cell near {:?}, discarding shot", proj_pos);
        }
    }
}

/// A projectile that leaves the bottom of the field without colliding
/// is a miss: despawn it and return to aiming, with no grid mutation.
fn check_missed_exit(
    mut commands: Commands,
    config: Res<GameConfig>,
    query: Query<(Entity, &Transform), With<Projectile>>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    for (entity, transform) in &query {
        if transform.translation.y > config.canvas_height + config.cell_size {
            commands.entity(entity).despawn();
            next_phase.set(GamePhase::Aiming);
            info!("projectile left the field, returning to aiming");
        }
    }
}
