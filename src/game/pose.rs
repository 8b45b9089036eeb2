//! Viewpoint pose.
//!
//! The pose is the player's continuous position on the floor plane plus the
//! facing angle. Height is fixed at [`EYE_HEIGHT`].
//!
//! # Coordinate System
//!
//! - `x`: world X, columns grow toward `+x`
//! - `z`: world Z, rows grow toward `+z`
//! - `yaw`: radians; `0` faces `-z`, positive values turn left (counterclockwise
//!   seen from above)
//!
//! Moving forward at yaw `θ` displaces the viewpoint by `(-sin θ, -cos θ)`.

use crate::math::coordinates::{self, TilePosition, constants::EYE_HEIGHT};
use crate::math::normalize_angle;
use crate::maze::GridMap;

/// The player's position and facing direction.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World X.
    pub x: f32,
    /// World Z.
    pub z: f32,
    /// Facing angle in radians.
    pub yaw: f32,
}

impl Pose {
    /// Creates a pose.
    pub fn new(x: f32, z: f32, yaw: f32) -> Self {
        Self { x, z, yaw }
    }

    /// Pose at the map's start cell, facing yaw `0`.
    pub fn at_start(map: &GridMap) -> Self {
        let (x, z) = coordinates::spawn_position(map);
        Self { x, z, yaw: 0.0 }
    }

    /// Unit displacement for one step forward.
    pub fn forward(&self) -> (f32, f32) {
        (-self.yaw.sin(), -self.yaw.cos())
    }

    /// Position displaced `distance` units along the facing direction.
    ///
    /// Negative distances move backward.
    pub fn translated(&self, distance: f32) -> Self {
        let (dx, dz) = self.forward();
        Self {
            x: self.x + dx * distance,
            z: self.z + dz * distance,
            yaw: self.yaw,
        }
    }

    /// Pose turned by `delta` radians (positive turns left).
    ///
    /// The resulting yaw is kept in `[-π, π]`.
    pub fn rotated(&self, delta: f32) -> Self {
        Self {
            yaw: normalize_angle(self.yaw + delta),
            ..*self
        }
    }

    /// 3D eye position `[x, y, z]` for the scene camera.
    pub fn eye_position(&self) -> [f32; 3] {
        [self.x, EYE_HEIGHT, self.z]
    }

    /// Tile-space position of the viewpoint for the given map size.
    pub fn tile_position(&self, maze_dimensions: (usize, usize)) -> TilePosition {
        coordinates::world_to_tile(self.x, self.z, maze_dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_forward_at_zero_yaw_is_negative_z() {
        let pose = Pose::new(0.0, 0.0, 0.0).translated(2.5);
        assert!(pose.x.abs() < 1e-6);
        assert!((pose.z + 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let start = Pose::new(10.0, -4.0, 0.7);
        let there = start.translated(5.0);
        let back = there.translated(-5.0);
        assert!((back.x - start.x).abs() < 1e-4);
        assert!((back.z - start.z).abs() < 1e-4);
    }

    #[test]
    fn test_quarter_turn_left_faces_negative_x() {
        let pose = Pose::new(0.0, 0.0, 0.0).rotated(FRAC_PI_2).translated(1.0);
        assert!((pose.x + 1.0).abs() < 1e-6);
        assert!(pose.z.abs() < 1e-6);
    }

    #[test]
    fn test_yaw_stays_wrapped() {
        let mut pose = Pose::default();
        for _ in 0..1_000 {
            pose = pose.rotated(0.05);
        }
        assert!(pose.yaw.abs() <= std::f32::consts::PI);
    }

    #[test]
    fn test_eye_height_fixed() {
        let pose = Pose::new(3.0, 4.0, 1.0);
        assert_eq!(pose.eye_position(), [3.0, EYE_HEIGHT, 4.0]);
    }
}
