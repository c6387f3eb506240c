//! The grid that holds all settled bubbles.
//!
//! Uses a HashMap for sparse storage - only occupied cells are stored.
//! The map is the authority on occupancy; the entities it points at
//! carry the color and pixel position.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::{config::GameConfig, lattice::Cell};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Grid>();
    app.register_type::<Grid>();
}

/// The main grid resource holding all settled bubbles.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Grid {
    /// Map from lattice cells to bubble entities.
    #[reflect(ignore)]
    bubbles: HashMap<Cell, Entity>,
}

impl Grid {
    /// Check if a cell is occupied.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.bubbles.contains_key(&cell)
    }

    /// Get the bubble entity at a cell, if any.
    pub fn get(&self, cell: Cell) -> Option<Entity> {
        self.bubbles.get(&cell).copied()
    }

    /// Insert a bubble at a cell.
    ///
    /// Returns the previous entity if the cell was occupied.
    pub fn insert(&mut self, cell: Cell, entity: Entity) -> Option<Entity> {
        self.bubbles.insert(cell, entity)
    }

    /// Remove a bubble from a cell.
    ///
    /// Returns the entity that was removed, if any.
    pub fn remove(&mut self, cell: Cell) -> Option<Entity> {
        self.bubbles.remove(&cell)
    }

    /// Clear all bubbles from the grid.
    pub fn clear(&mut self) {
        self.bubbles.clear();
    }

    /// Get the number of bubbles in the grid.
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Iterate over all occupied cells.
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &Entity)> {
        self.bubbles.iter()
    }

    /// Re-key every bubble one row further down (grid advance).
    ///
    /// The caller moves the matching transforms and inserts the fresh
    /// top row afterwards; row 0 is guaranteed empty when this returns.
    pub fn shift_down(&mut self) {
        self.bubbles = self
            .bubbles
            .drain()
            .map(|(cell, entity)| (Cell::new(cell.col, cell.row + 1), entity))
            .collect();
    }

    /// The lowest occupied row (largest row index).
    pub fn lowest_row(&self) -> Option<i32> {
        self.bubbles.keys().map(|c| c.row).max()
    }

    /// `true` iff any settled bubble's bottom edge has reached the loss line.
    pub fn breaches_line(&self, config: &GameConfig) -> bool {
        self.lowest_row().is_some_and(|row| {
            let bottom = Cell::new(0, row).center(config.cell_size).y + config.cell_size / 2.0;
            bottom >= config.loss_line_y
        })
    }

    /// Find the closest free cell to a pixel-space position.
    ///
    /// Used when a landing projectile needs to snap to the grid. The
    /// containing cell is preferred; if it is taken, neighbors are
    /// searched in expanding rings so a landing displaces to the
    /// nearest free cell instead of overwriting an occupied one.
    pub fn closest_free_cell(&self, position: Vec2, config: &GameConfig) -> Option<Cell> {
        let target = Cell::from_point(position, config.cell_size);
        let columns = config.columns();
        let valid = |cell: Cell| cell.col >= 0 && cell.col < columns && cell.row >= 0;

        if valid(target) && !self.is_occupied(target) {
            return Some(target);
        }

        // Search neighbors in expanding rings.
        let mut checked = HashSet::new();
        let mut to_check = vec![target];

        while !to_check.is_empty() {
            let mut next_ring = Vec::new();

            for cell in to_check {
                if !checked.insert(cell) {
                    continue;
                }

                if valid(cell) && !self.is_occupied(cell) {
                    return Some(cell);
                }

                for neighbor in cell.neighbors() {
                    if !checked.contains(&neighbor) {
                        next_ring.push(neighbor);
                    }
                }
            }

            to_check = next_ring;

            // Safety limit to prevent unbounded search on a packed grid.
            if checked.len() > 1000 {
                break;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_occupancy_roundtrip() {
        let mut grid = Grid::default();
        let e = entities(1)[0];
        let cell = Cell::new(3, 1);

        assert!(!grid.is_occupied(cell));
        assert!(grid.insert(cell, e).is_none());
        assert!(grid.is_occupied(cell));
        assert_eq!(grid.get(cell), Some(e));
        assert_eq!(grid.remove(cell), Some(e));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_shift_down_rekeys_every_cell() {
        let mut grid = Grid::default();
        let es = entities(2);
        grid.insert(Cell::new(0, 0), es[0]);
        grid.insert(Cell::new(4, 2), es[1]);

        grid.shift_down();

        assert!(!grid.is_occupied(Cell::new(0, 0)));
        assert_eq!(grid.get(Cell::new(0, 1)), Some(es[0]));
        assert_eq!(grid.get(Cell::new(4, 3)), Some(es[1]));
        assert_eq!(grid.lowest_row(), Some(3));
    }

    #[test]
    fn test_closest_free_cell_prefers_containing_cell() {
        let grid = Grid::default();
        let config = GameConfig::default();
        let found = grid.closest_free_cell(Vec2::new(215.0, 55.0), &config);
        assert_eq!(found, Some(Cell::new(5, 1)));
    }

    #[test]
    fn test_closest_free_cell_displaces_off_occupied_cell() {
        let mut grid = Grid::default();
        let config = GameConfig::default();
        let e = entities(1)[0];
        let taken = Cell::new(5, 1);
        grid.insert(taken, e);

        let found = grid.closest_free_cell(taken.center(config.cell_size), &config).unwrap();
        assert_ne!(found, taken);
        assert!(taken.neighbors().contains(&found));
    }

    #[test]
    fn test_breaches_line_uses_bubble_bottom_edge() {
        let mut grid = Grid::default();
        let config = GameConfig::default();
        let es = entities(2);

        // Row 7 bottom edge is at 320, above the default 360 loss line.
        grid.insert(Cell::new(0, 7), es[0]);
        assert!(!grid.breaches_line(&config));

        // Row 8 bottom edge is at exactly 360.
        grid.insert(Cell::new(1, 8), es[1]);
        assert!(grid.breaches_line(&config));
    }
}
