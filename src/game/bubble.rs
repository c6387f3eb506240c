//! Bubble entities - the main game objects.
//!
//! Bubbles occupy lattice cells once settled and carry a color.
//! When 3+ of the same color are connected, they pop.

use bevy::prelude::*;

use super::{config::GameConfig, lattice::Cell};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bubble>();
    app.register_type::<BubbleColor>();
}

/// The different bubble colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component, Reflect, Default)]
#[reflect(Component)]
pub enum BubbleColor {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
}

impl BubbleColor {
    /// All possible bubble colors.
    pub const ALL: [BubbleColor; 5] = [
        BubbleColor::Red,
        BubbleColor::Green,
        BubbleColor::Blue,
        BubbleColor::Yellow,
        BubbleColor::Magenta,
    ];
}

/// A settled bubble on the grid.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Bubble {
    /// The bubble's color.
    pub color: BubbleColor,
    /// The lattice cell this bubble occupies.
    pub cell: Cell,
}

/// Spawn a single settled bubble at the given cell with the given color.
///
/// The caller is responsible for registering the entity in the [`Grid`]
/// resource; this only creates the entity at the cell's center.
///
/// [`Grid`]: super::grid::Grid
pub fn spawn_bubble(
    commands: &mut Commands,
    config: &GameConfig,
    cell: Cell,
    color: BubbleColor,
) -> Entity {
    let center = cell.center(config.cell_size);
    commands
        .spawn((
            Name::new(format!("Bubble {:?} at {}", color, cell)),
            Bubble { color, cell },
            Transform::from_translation(center.extend(0.0)),
        ))
        .id()
}
