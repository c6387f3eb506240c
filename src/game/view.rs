//! Read-only snapshot surface for the rendering collaborator.
//!
//! The embedder requests a [`GameView`] in one of its own systems and
//! draws from it; nothing here mutates the simulation.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    aim::AimVector,
    bubble::{Bubble, BubbleColor},
    config::GameConfig,
    popper::Popping,
    projectile::Projectile,
    state::{GamePhase, PopCount},
};

/// One settled (or popping) bubble as the renderer should draw it.
#[derive(Debug, Clone, Copy)]
pub struct BubbleView {
    pub position: Vec2,
    pub color: BubbleColor,
    /// 1.0 while settled, shrinking toward 0.0 while popping.
    pub scale: f32,
    /// 1.0 while settled, fading toward 0.0 while popping.
    pub alpha: f32,
}

/// The in-flight projectile as the renderer should draw it.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileView {
    pub position: Vec2,
    pub color: BubbleColor,
}

/// Per-frame read-only view of the whole simulation.
#[derive(SystemParam)]
pub struct GameView<'w, 's> {
    phase: Res<'w, State<GamePhase>>,
    config: Res<'w, GameConfig>,
    time: Res<'w, Time>,
    pop_count: Res<'w, PopCount>,
    aim: Res<'w, AimVector>,
    bubbles: Query<'w, 's, (&'static Bubble, &'static Transform, Option<&'static Popping>)>,
    projectile: Query<'w, 's, (&'static Projectile, &'static Transform)>,
}

impl GameView<'_, '_> {
    /// The current phase.
    pub fn phase(&self) -> GamePhase {
        *self.phase.get()
    }

    /// Cumulative popped-bubble count.
    pub fn popped(&self) -> u32 {
        self.pop_count.popped
    }

    pub fn won(&self) -> bool {
        self.phase() == GamePhase::Win
    }

    pub fn lost(&self) -> bool {
        self.phase() == GamePhase::GameOver
    }

    /// The drag vector, present only during an active aim gesture.
    pub fn aim(&self) -> Option<Vec2> {
        self.aim.0
    }

    /// Every bubble on the grid with its current pop scale/fade applied.
    pub fn bubbles(&self) -> impl Iterator<Item = BubbleView> + '_ {
        let now = self.time.elapsed_secs();
        let duration = self.config.pop_duration_secs;

        self.bubbles.iter().map(move |(bubble, transform, popping)| {
            let progress = popping.map_or(0.0, |p| p.progress(now, duration));
            BubbleView {
                position: transform.translation.truncate(),
                color: bubble.color,
                scale: 1.0 - progress,
                alpha: 1.0 - progress,
            }
        })
    }

    /// The projectile, absent outside the Shot phase.
    pub fn projectile(&self) -> Option<ProjectileView> {
        self.projectile
            .iter()
            .next()
            .map(|(projectile, transform)| ProjectileView {
                position: transform.translation.truncate(),
                color: projectile.color,
            })
    }
}
