//! Random payload generation - colors, projectile previews, grid rows.
//!
//! The shooter always has a "loaded" color ready to fire and a "next"
//! color preview; both cycle on every launch.

use bevy::prelude::*;
use rand::Rng;

use super::{
    bubble::{spawn_bubble, BubbleColor},
    config::GameConfig,
    grid::Grid,
    lattice::Cell,
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<LoadedColor>();
    app.init_resource::<NextColor>();
    app.register_type::<LoadedColor>();
    app.register_type::<NextColor>();
}

/// The color the next launch will fire.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct LoadedColor(pub BubbleColor);

/// The color after that (preview for the embedder to draw).
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct NextColor(pub BubbleColor);

/// Uniform pick over the configured palette.
pub fn random_color(palette: &[BubbleColor]) -> BubbleColor {
    if palette.is_empty() {
        return BubbleColor::default();
    }
    let mut rng = rand::rng();
    palette[rng.random_range(0..palette.len())]
}

/// Fill every column of row 0 with independently random colors.
///
/// Callers shift the existing grid down first; row 0 is expected to be
/// empty when this runs.
pub fn spawn_row(commands: &mut Commands, grid: &mut Grid, config: &GameConfig) {
    for col in 0..config.columns() {
        let cell = Cell::new(col, 0);
        let color = random_color(&config.palette);
        let entity = spawn_bubble(commands, config, cell, color);
        grid.insert(cell, entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_color_stays_in_palette() {
        let palette = [BubbleColor::Red, BubbleColor::Blue];
        for _ in 0..50 {
            assert!(palette.contains(&random_color(&palette)));
        }
    }

    #[test]
    fn test_random_color_tolerates_empty_palette() {
        assert_eq!(random_color(&[]), BubbleColor::default());
    }
}
