//! The square lattice that settled bubbles snap to.
//!
//! Cell (0, 0) is the top-left corner of the canvas; columns grow to
//! the right and rows grow downward, matching canvas coordinates. A
//! settled bubble's center always sits at the center of its cell:
//! `x = col * cell_size + cell_size / 2`, same for `y`.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Cell>();
}

/// A lattice cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component, Reflect)]
#[reflect(Component)]
pub struct Cell {
    /// Column (x-axis, grows right).
    pub col: i32,
    /// Row (y-axis, grows downward).
    pub row: i32,
}

impl Cell {
    /// Create a new cell coordinate.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The pixel-space center of this cell.
    pub fn center(&self, cell_size: f32) -> Vec2 {
        Vec2::new(
            self.col as f32 * cell_size + cell_size / 2.0,
            self.row as f32 * cell_size + cell_size / 2.0,
        )
    }

    /// The cell containing a pixel-space point.
    pub fn from_point(point: Vec2, cell_size: f32) -> Self {
        Self {
            col: (point.x / cell_size).floor() as i32,
            row: (point.y / cell_size).floor() as i32,
        }
    }

    /// The 4 laterally adjacent cells. Used to expand the search ring
    /// when a landing cell is already taken; match adjacency is
    /// distance-based and does not go through here.
    pub fn neighbors(&self) -> [Cell; 4] {
        [
            Cell::new(self.col + 1, self.row),
            Cell::new(self.col - 1, self.row),
            Cell::new(self.col, self.row - 1),
            Cell::new(self.col, self.row + 1),
        ]
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f32 = 40.0;

    #[test]
    fn test_center_is_cell_midpoint() {
        assert_eq!(Cell::new(0, 0).center(CELL), Vec2::new(20.0, 20.0));
        assert_eq!(Cell::new(5, 2).center(CELL), Vec2::new(220.0, 100.0));
    }

    #[test]
    fn test_point_roundtrip() {
        let original = Cell::new(7, 3);
        let back = Cell::from_point(original.center(CELL), CELL);
        assert_eq!(original, back);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let point = Vec2::new(133.7, 58.2);
        let snapped = Cell::from_point(point, CELL).center(CELL);
        let again = Cell::from_point(snapped, CELL).center(CELL);
        assert_eq!(snapped, again);
    }

    #[test]
    fn test_off_center_point_maps_to_containing_cell() {
        assert_eq!(Cell::from_point(Vec2::new(39.9, 0.1), CELL), Cell::new(0, 0));
        assert_eq!(Cell::from_point(Vec2::new(40.1, 79.9), CELL), Cell::new(1, 1));
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let cell = Cell::new(3, 3);
        for neighbor in cell.neighbors() {
            let d = cell.center(CELL).distance(neighbor.center(CELL));
            assert_eq!(d, CELL);
        }
    }
}
