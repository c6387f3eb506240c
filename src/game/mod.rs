//! The simulation core for the bubble shooter.
//!
//! This module contains all the gameplay logic including:
//! - Square lattice system (cell coordinates and snapping)
//! - Bubble entities and colors
//! - The grid of settled bubbles
//! - Aiming and launch mechanics
//! - Projectile physics and collision
//! - Match detection and the pop lifecycle
//! - Phase state management and win/loss rules

mod aim;
mod bubble;
mod cluster;
mod config;
mod grid;
mod lattice;
mod popper;
mod projectile;
mod spawner;
mod state;
mod view;

use bevy::prelude::*;

pub use aim::{AimVector, PointerDown, PointerMove, PointerUp};
pub use bubble::{Bubble, BubbleColor};
pub use cluster::ClusterMatched;
pub use config::{GameConfig, ResizeCanvas};
pub use grid::Grid;
pub use lattice::Cell;
pub use popper::{BubblesPruned, Popping};
pub use projectile::{BubbleLanded, FireProjectile, Projectile};
pub use spawner::{LoadedColor, NextColor};
pub use state::{EnterPlay, GamePhase, PopCount, ResetGame};
pub use view::{BubbleView, GameView, ProjectileView};

pub(super) fn plugin(app: &mut App) {
    // The within-frame mutation order. Projectile flight and landing run
    // first, then match detection over the updated grid, then pop
    // progression, then the win/loss rules. Keeping this a single chain
    // serializes every grid mutation a frame can produce.
    app.configure_sets(
        Update,
        (
            projectile::ProjectileSystems,
            cluster::ClusterSystems,
            popper::PopSystems,
            state::RuleSystems,
        )
            .chain()
            .in_set(crate::AppSystems::Update),
    );

    app.add_plugins((
        lattice::plugin,
        config::plugin,
        bubble::plugin,
        grid::plugin,
        spawner::plugin,
        aim::plugin,
        projectile::plugin,
        cluster::plugin,
        popper::plugin,
        state::plugin,
    ));
}
