//! Math utilities for the walk and the minimap.
//!
//! # Module Organization
//!
//! - [`coordinates`] module converts between world, tile and grid space
//! - Angle helpers are provided at root level

pub mod coordinates;

use std::f32::consts::{PI, TAU};

/// Converts degrees to radians.
///
/// Unlike a plain `to_radians`, the input is first wrapped into `(-360, 360)`.
///
/// # Example
/// ```
/// use maze3d::math::deg_to_rad;
///
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
/// assert_eq!(deg_to_rad(540.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (PI / 180.0)
}

/// Wraps an angle in radians into `[-π, π]`.
///
/// Angles already in range are returned unchanged.
pub fn normalize_angle(angle: f32) -> f32 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI { wrapped + TAU } else { wrapped }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert_eq!(normalize_angle(0.01), 0.01);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }
}
