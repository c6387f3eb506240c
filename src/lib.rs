//! Headless bubble-shooter simulation engine.
//!
//! This crate owns the full gameplay core — the lattice grid of settled
//! bubbles, projectile flight and collision, connected-component color
//! matching, the timed pop lifecycle, and the phase state machine.
//! Rendering, raw pointer capture, and page chrome stay with the
//! embedder: it feeds already-translated pointer coordinates in as
//! messages, drives `App::update` once per frame, and reads the state
//! back through [`game::GameView`].

pub mod game;

use bevy::prelude::*;

pub use game::{
    AimVector, Bubble, BubbleColor, BubbleLanded, BubbleView, BubblesPruned, Cell, ClusterMatched,
    EnterPlay, FireProjectile, GameConfig, GamePhase, GameView, Grid, LoadedColor, NextColor,
    PointerDown, PointerMove, PointerUp, PopCount, Popping, Projectile, ProjectileView, ResetGame,
    ResizeCanvas,
};

/// The engine as a single plugin. Add it to an [`App`] alongside the
/// `MinimalPlugins` (or the full defaults) and a states plugin.
pub struct EnginePlugin;

impl Plugin for EnginePlugin {
    fn build(&self, app: &mut App) {
        // Order the top-level frame flow: timers tick first, then external
        // input is recorded, then the simulation advances.
        app.configure_sets(
            Update,
            (
                AppSystems::TickTimers,
                AppSystems::RecordInput,
                AppSystems::Update,
            )
                .chain(),
        );

        app.add_plugins(game::plugin);
    }
}

/// High-level groupings of systems for the app in the `Update` schedule.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Tick timers.
    TickTimers,
    /// Record external input and commands.
    RecordInput,
    /// Do everything else.
    Update,
}
