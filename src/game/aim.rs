//! Aiming input - drag vector capture and launch.
//!
//! The embedder translates raw pointer events into canvas coordinates
//! and forwards them as messages. A drag from the launch point builds
//! the aim vector; releasing it fires the loaded bubble. Everything
//! here is a no-op outside the Aiming phase.

use bevy::prelude::*;

use super::{
    config::GameConfig,
    projectile::FireProjectile,
    spawner::{random_color, LoadedColor, NextColor},
    state::GamePhase,
};
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<AimVector>();
    app.register_type::<AimVector>();
    app.add_message::<PointerDown>();
    app.add_message::<PointerMove>();
    app.add_message::<PointerUp>();

    app.add_systems(
        Update,
        (record_pointer, release_pointer)
            .chain()
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(GamePhase::Aiming)),
    );
    app.add_systems(OnEnter(GamePhase::Aiming), drop_stale_pointer_input);
    app.add_systems(OnExit(GamePhase::Aiming), clear_aim);
}

/// A pointer press at translated canvas coordinates. Starts a drag.
#[derive(Message, Debug, Clone)]
pub struct PointerDown {
    pub x: f32,
    pub y: f32,
}

/// Pointer movement during a drag.
#[derive(Message, Debug, Clone)]
pub struct PointerMove {
    pub x: f32,
    pub y: f32,
}

/// Pointer release. Fires if a usable aim vector is held.
#[derive(Message, Debug, Clone)]
pub struct PointerUp;

/// The current drag vector from the launch point toward the pointer.
/// `None` whenever no drag is active; never outlives the gesture.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct AimVector(pub Option<Vec2>);

/// Pointer input delivered outside the Aiming phase is ignored, not
/// queued. Messages linger for two update cycles while the gated
/// readers above are skipped, so anything still buffered when aiming
/// resumes is a stale press from the previous shot.
fn drop_stale_pointer_input(
    mut downs: ResMut<Messages<PointerDown>>,
    mut moves: ResMut<Messages<PointerMove>>,
    mut ups: ResMut<Messages<PointerUp>>,
) {
    downs.clear();
    moves.clear();
    ups.clear();
}

/// A forced exit (a row-advance loss mid-drag) must not leave a live
/// aim vector behind for the view to report.
fn clear_aim(mut aim: ResMut<AimVector>) {
    aim.0 = None;
}

/// Update the aim vector from presses and drag movement.
fn record_pointer(
    config: Res<GameConfig>,
    mut aim: ResMut<AimVector>,
    mut downs: MessageReader<PointerDown>,
    mut moves: MessageReader<PointerMove>,
) {
    for event in downs.read() {
        update_aim(&mut aim, &config, event.x, event.y);
    }
    for event in moves.read() {
        // Movement only steers an active drag.
        if aim.0.is_some() {
            update_aim(&mut aim, &config, event.x, event.y);
        }
    }
}

fn update_aim(aim: &mut AimVector, config: &GameConfig, x: f32, y: f32) {
    let point = Vec2::new(x, y);
    if !point.is_finite() {
        warn!("ignoring non-finite pointer position");
        return;
    }

    let direction = point - config.spawn_point();
    // Downward drags never aim; the grid is above the launch point.
    if direction.y > 0.0 {
        return;
    }

    aim.0 = Some(direction);
}

/// Fire on release, then cycle the loaded/next colors.
fn release_pointer(
    config: Res<GameConfig>,
    mut aim: ResMut<AimVector>,
    mut loaded: ResMut<LoadedColor>,
    mut next_color: ResMut<NextColor>,
    mut ups: MessageReader<PointerUp>,
    mut fire: MessageWriter<FireProjectile>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    for _ in ups.read() {
        // The vector is dropped on release whether or not it fires.
        let Some(held) = aim.0.take() else {
            continue;
        };
        // A zero-length drag is a cancelled gesture, not an error.
        let Some(direction) = held.try_normalize() else {
            continue;
        };

        let color = loaded.0;
        fire.write(FireProjectile {
            velocity: direction * config.shot_speed,
            color,
        });
        loaded.0 = next_color.0;
        next_color.0 = random_color(&config.palette);
        next_phase.set(GamePhase::Shot);

        info!("fired {:?} bubble toward {:?}", color, direction);
    }
}
