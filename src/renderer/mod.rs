//! Minimap rendering.
//!
//! The 3D scene is out of scope for this crate; renderers read the pose and
//! run state from [`MazeSession`](crate::game::session::MazeSession). What
//! lives here is the 2D schematic drawn on top of it.

/// Static map layer and field-of-view overlay.
pub mod minimap;
/// Fixed-step ray marching over the grid.
pub mod raycast;
/// Drawing targets the minimap renders into.
pub mod surface;
