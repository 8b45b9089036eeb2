//! Coordinate system transformations between different representations.
//!
//! This module provides functions to convert between world coordinates, tile
//! coordinates and grid cells, making it clear how to map between these systems.

use super::constants::{LOOKAHEAD_OFFSET, MARKER_OFFSET_X, MARKER_OFFSET_Y, TILE_SIZE};
use crate::maze::Cell;

/// A continuous position in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TilePosition {
    /// Column axis.
    pub tx: f32,
    /// Row axis.
    pub ty: f32,
}

impl TilePosition {
    /// Creates a tile position.
    pub fn new(tx: f32, ty: f32) -> Self {
        Self { tx, ty }
    }

    /// The grid cell containing this position, or `None` outside
    /// `[0, width) x [0, height)`.
    pub fn cell(&self, maze_dimensions: (usize, usize)) -> Option<Cell> {
        let (maze_width, maze_height) = maze_dimensions;
        let col = self.tx.floor();
        let row = self.ty.floor();
        if col < 0.0 || row < 0.0 || col >= maze_width as f32 || row >= maze_height as f32 {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }

    /// Euclidean distance to another tile position.
    pub fn distance(&self, other: TilePosition) -> f32 {
        (self.tx - other.tx).hypot(self.ty - other.ty)
    }
}

/// Total world extent of the level as `(platform_width, platform_height)`.
pub fn platform_size(maze_dimensions: (usize, usize)) -> (f32, f32) {
    let (maze_width, maze_height) = maze_dimensions;
    (maze_width as f32 * TILE_SIZE, maze_height as f32 * TILE_SIZE)
}

/// Converts a world position to tile coordinates.
///
/// # Arguments
/// * `x`, `z` - World position on the floor plane
/// * `maze_dimensions` - The dimensions of the maze (width, height) in cells
///
/// # Coordinate System
/// - `tx = (x + platform_width / 2) / TILE_SIZE + MARKER_OFFSET_X`
/// - `ty = (z + platform_height / 2) / TILE_SIZE + MARKER_OFFSET_Y`
///
/// The offsets recenter the minimap marker on the collision footprint, which
/// is biased by [`LOOKAHEAD_OFFSET`].
pub fn world_to_tile(x: f32, z: f32, maze_dimensions: (usize, usize)) -> TilePosition {
    let (platform_width, platform_height) = platform_size(maze_dimensions);
    TilePosition {
        tx: (x + platform_width / 2.0) / TILE_SIZE + MARKER_OFFSET_X,
        ty: (z + platform_height / 2.0) / TILE_SIZE + MARKER_OFFSET_Y,
    }
}

/// Converts a grid cell to the world position its geometry is placed at.
///
/// # Returns
/// `(x, z)` with `x = -platform_width / 2 + TILE_SIZE * col` and
/// `z = -platform_height / 2 + TILE_SIZE * row`.
pub fn cell_to_world(cell: Cell, maze_dimensions: (usize, usize)) -> (f32, f32) {
    let (platform_width, platform_height) = platform_size(maze_dimensions);
    (
        -platform_width / 2.0 + TILE_SIZE * cell.col as f32,
        -platform_height / 2.0 + TILE_SIZE * cell.row as f32,
    )
}

/// World position of cell `(0, 0)`, the reference point for collision lookups.
pub fn world_origin(maze_dimensions: (usize, usize)) -> (f32, f32) {
    cell_to_world(Cell::new(0, 0), maze_dimensions)
}

/// Tile position of a cell's world placement point.
pub fn cell_tile_position(cell: Cell, maze_dimensions: (usize, usize)) -> TilePosition {
    let (x, z) = cell_to_world(cell, maze_dimensions);
    world_to_tile(x, z, maze_dimensions)
}

/// Grid index along one axis for a collision lookup.
///
/// `|floor((origin - candidate + LOOKAHEAD_OFFSET) / TILE_SIZE)|`, clamped to
/// the last valid index.
pub fn movement_axis_index(origin: f32, candidate: f32, dimension: usize) -> usize {
    let raw = ((origin - candidate + LOOKAHEAD_OFFSET) / TILE_SIZE).floor();
    let index = raw.abs() as usize;
    index.min(dimension.saturating_sub(1))
}

/// Grid cell tested when the viewpoint moves to `candidate`.
///
/// # Arguments
/// * `origin` - World position of cell `(0, 0)`, see [`world_origin`]
/// * `candidate` - Candidate world position `(x, z)`
/// * `maze_dimensions` - The dimensions of the maze (width, height) in cells
///
/// # Returns
/// Always a cell inside the map; out-of-range positions are clamped.
pub fn movement_cell(
    origin: (f32, f32),
    candidate: (f32, f32),
    maze_dimensions: (usize, usize),
) -> Cell {
    let (maze_width, maze_height) = maze_dimensions;
    let col = movement_axis_index(origin.0, candidate.0, maze_width);
    let row = movement_axis_index(origin.1, candidate.1, maze_height);
    Cell::new(row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_round_trip() {
        let dims = (7, 5);
        for row in 0..5 {
            for col in 0..7 {
                let cell = Cell::new(row, col);
                let (x, z) = cell_to_world(cell, dims);
                let tile = world_to_tile(x, z, dims);
                assert_eq!(tile.cell(dims), Some(cell));
                assert_eq!(movement_cell(world_origin(dims), (x, z), dims), cell);
            }
        }
    }

    #[test]
    fn test_marker_offsets_applied() {
        let dims = (3, 3);
        let tile = cell_tile_position(Cell::new(1, 1), dims);
        assert!((tile.tx - 1.2).abs() < 1e-6);
        assert!((tile.ty - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_tile_outside_grid_is_none() {
        let dims = (3, 2);
        assert_eq!(TilePosition::new(-0.01, 0.5).cell(dims), None);
        assert_eq!(TilePosition::new(3.0, 0.5).cell(dims), None);
        assert_eq!(TilePosition::new(0.5, 2.0).cell(dims), None);
        assert_eq!(TilePosition::new(2.99, 1.99).cell(dims), Some(Cell::new(1, 2)));
    }

    #[test]
    fn test_lookahead_biases_toward_next_cell() {
        // One cell is 100 units; cell 2 sits at origin + 200.
        let origin = 0.0;
        assert_eq!(movement_axis_index(origin, 200.0, 10), 2);
        // Positive direction: still cell 2 until 75 units past the center.
        assert_eq!(movement_axis_index(origin, 275.0, 10), 2);
        assert_eq!(movement_axis_index(origin, 276.0, 10), 3);
        // Negative direction: cell 1 is entered only 25 units from the center.
        assert_eq!(movement_axis_index(origin, 176.0, 10), 2);
        assert_eq!(movement_axis_index(origin, 175.0, 10), 1);
    }

    #[test]
    fn test_movement_index_clamped_to_last_cell() {
        assert_eq!(movement_axis_index(0.0, -10_000.0, 4), 3);
        assert_eq!(movement_axis_index(0.0, 10_000.0, 4), 3);
        assert_eq!(movement_axis_index(0.0, 0.0, 4), 0);
    }
}
