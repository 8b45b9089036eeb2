//! Coordinate system transformations for the maze.
//!
//! Three coordinate systems are in play:
//! - **World**: continuous `(x, z)` on the floor plane where the viewpoint moves.
//!   The level is centered on the origin and each cell is [`TILE_SIZE`] wide.
//! - **Tile**: continuous `(tx, ty)` in cell units, used by the minimap and the
//!   ray marcher.
//! - **Grid**: integer [`Cell`](crate::maze::Cell) addresses into the map.

mod positions;
mod transformations;

pub use positions::*;
pub use transformations::*;

/// Constants for the world layout
pub mod constants {
    /// Side length of one grid cell in world units.
    pub const TILE_SIZE: f32 = 100.0;

    /// Height of the viewpoint above the floor.
    pub const EYE_HEIGHT: f32 = 50.0;

    /// Horizontal shift applied to tile positions so the minimap marker lines
    /// up with the collision footprint.
    pub const MARKER_OFFSET_X: f32 = 0.2;

    /// Vertical shift applied to tile positions so the minimap marker lines
    /// up with the collision footprint.
    pub const MARKER_OFFSET_Y: f32 = 0.4;

    /// World-space bias added before collision lookups so the cell being
    /// entered is tested instead of the one being left.
    pub const LOOKAHEAD_OFFSET: f32 = 75.0;
}
