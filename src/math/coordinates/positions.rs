//! Special positions and cell finding utilities.
//!
//! This module provides functions to find and work with special positions
//! in the maze, such as the spawn point and the exits.

use super::transformations::{TilePosition, cell_tile_position, cell_to_world};
use crate::maze::{Cell, GridMap};

/// World position of the start cell, where the viewpoint spawns.
pub fn spawn_position(map: &GridMap) -> (f32, f32) {
    cell_to_world(map.start(), map.dimensions())
}

/// The exit cell closest to `from` in tile space.
///
/// Ties are broken by row-major order. Returns `None` only for maps without
/// exits, which validated maps never are.
pub fn nearest_exit(map: &GridMap, from: TilePosition) -> Option<Cell> {
    let dims = map.dimensions();
    map.exits().iter().copied().min_by(|a, b| {
        let da = from.distance(cell_tile_position(*a, dims));
        let db = from.distance(cell_tile_position(*b, dims));
        da.total_cmp(&db)
    })
}

/// Heading in radians from one tile position to another, in the minimap's
/// angle convention (`0` points along `+tx`, `π/2` along `+ty`).
pub fn heading_between(from: TilePosition, to: TilePosition) -> f32 {
    (to.ty - from.ty).atan2(to.tx - from.tx)
}
