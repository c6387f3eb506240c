//! Engine configuration.
//!
//! Every tunable lives in one resource so the embedder can supply its
//! own values at startup. The defaults reproduce the classic layout:
//! 40 px cells, 11 columns, 5 colors.

use bevy::prelude::*;

use super::bubble::BubbleColor;
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameConfig>();
    app.register_type::<GameConfig>();
    app.add_message::<ResizeCanvas>();
    app.add_systems(Update, apply_resize.in_set(AppSystems::RecordInput));
}

/// Message from the embedder when the canvas changes size.
///
/// Resizing never resets game state, and existing positions are not
/// rescaled; only the bounds the projectile reflects off change.
#[derive(Message, Debug, Clone)]
pub struct ResizeCanvas {
    pub width: f32,
    pub height: f32,
}

/// All engine tunables.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct GameConfig {
    /// Width and height of one lattice cell (the bubble diameter) in pixels.
    pub cell_size: f32,
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Colors bubbles are drawn from. Four or more keeps matches non-trivial.
    pub palette: Vec<BubbleColor>,
    /// Cumulative popped-bubble count required to win.
    pub win_threshold: u32,
    /// Projectile speed in pixels per second.
    pub shot_speed: f32,
    /// Seconds between grid row insertions.
    pub row_interval_secs: f32,
    /// Seconds a matched bubble spends shrinking before it is pruned.
    pub pop_duration_secs: f32,
    /// Slack applied to the collision and adjacency distances.
    pub collision_epsilon: f32,
    /// Bubbles whose bottom edge reaches this Y end the game.
    pub loss_line_y: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            canvas_width: 440.0,
            canvas_height: 510.0,
            palette: BubbleColor::ALL.to_vec(),
            win_threshold: 20,
            shot_speed: 600.0,
            row_interval_secs: 8.0,
            pop_duration_secs: 0.3,
            collision_epsilon: 2.0,
            loss_line_y: 360.0,
        }
    }
}

impl GameConfig {
    /// Number of lattice columns that fit the canvas.
    pub fn columns(&self) -> i32 {
        (self.canvas_width / self.cell_size).floor() as i32
    }

    /// Where projectiles launch from, below the playable grid area.
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.canvas_width / 2.0, self.canvas_height - 100.0)
    }

    /// Two bubbles within this distance are neighbors for matching.
    /// Slightly more than a cell, because snapping can leave a landed
    /// bubble marginally off-grid relative to its neighbors.
    pub fn link_distance(&self) -> f32 {
        self.cell_size + self.collision_epsilon
    }

    /// A projectile within this distance of a settled bubble has hit it.
    pub fn hit_distance(&self) -> f32 {
        self.cell_size - self.collision_epsilon
    }
}

/// Apply canvas resizes from the embedder.
fn apply_resize(mut config: ResMut<GameConfig>, mut resizes: MessageReader<ResizeCanvas>) {
    for event in resizes.read() {
        if !event.width.is_finite()
            || !event.height.is_finite()
            || event.width <= 0.0
            || event.height <= 0.0
        {
            warn!("ignoring invalid canvas size {}x{}", event.width, event.height);
            continue;
        }
        config.canvas_width = event.width;
        config.canvas_height = event.height;
        info!("canvas resized to {}x{}", event.width, event.height);
    }
}
