//! Minimap: static map layer plus the per-frame overlay.
//!
//! # Layers
//!
//! - **Static layer**: one square per cell, drawn once per level
//! - **Overlay**: player marker and field-of-view fan, redrawn every frame on
//!   a separate surface that is cleared first
//!
//! The overlay is composed as an [`OverlayFrame`] by a pure function of the
//! map, the pose and the configuration, then drawn in a second step. Nothing
//! is retained between frames.
//!
//! # Angle convention
//!
//! Ray headings use tile space (`0` along `+tx`, `π/2` along `+ty`). The fan
//! is centered on `-yaw + π/2 + π`: the world forward vector `(-sin, -cos)`
//! expressed as a tile-space angle.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::config::MinimapConfig;
use crate::game::pose::Pose;
use crate::math::coordinates::{self, TilePosition};
use crate::math::{deg_to_rad, lerp};
use crate::maze::GridMap;
use crate::renderer::raycast::{self, RayHit};
use crate::renderer::surface::{Color, OverlaySurface, Rect};

/// Wall cells on the static layer.
pub const WALL_COLOR: Color = Color::rgb8(0x33, 0x33, 0x33);
/// Every other cell on the static layer.
pub const FLOOR_COLOR: Color = Color::rgb8(0xee, 0xee, 0xee);
/// Player marker.
pub const MARKER_COLOR: Color = Color::BLACK;
/// Field-of-view rays.
pub const RAY_COLOR: Color = Color::rgba8(0, 0, 0, 0.25);
/// Field-of-view ray width in pixels.
pub const RAY_WIDTH: f32 = 0.5;
/// Direction hint line.
pub const HINT_COLOR: Color = Color::rgba8(0xd0, 0x20, 0x20, 0.8);
/// Direction hint width in pixels.
pub const HINT_WIDTH: f32 = 1.0;

/// Draws the static layer and sizes the surface to the map.
pub fn draw_static(map: &GridMap, map_scale: f32, surface: &mut dyn OverlaySurface) {
    let (width, height) = map.dimensions();
    surface.resize(
        (width as f32 * map_scale).round() as u32,
        (height as f32 * map_scale).round() as u32,
    );
    surface.clear();
    for (cell, kind) in map.iter() {
        let color = if kind.is_wall() {
            WALL_COLOR
        } else {
            FLOOR_COLOR
        };
        surface.fill_rect(
            Rect::new(
                cell.col as f32 * map_scale,
                cell.row as f32 * map_scale,
                map_scale,
                map_scale,
            ),
            color,
        );
    }
}

/// Heading of the ray at the center of the fan for a given yaw.
pub fn fan_center(yaw: f32) -> f32 {
    -yaw + FRAC_PI_2 + PI
}

/// Headings of the `ray_count + 1` rays spanning `fov` radians around `center`.
pub fn ray_headings(center: f32, fov: f32, ray_count: u32) -> impl Iterator<Item = f32> {
    let half = fov / 2.0;
    (0..=ray_count).map(move |i| {
        let t = if ray_count == 0 {
            0.5
        } else {
            i as f32 / ray_count as f32
        };
        lerp(center - half, center + half, t)
    })
}

/// One ray of the fan, in tile space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    /// Ray heading in radians.
    pub heading: f32,
    /// Where the ray ended.
    pub hit: RayHit,
}

/// Straight guide line toward the nearest exit, ignoring walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionHint {
    /// Tile position of the exit.
    pub target: TilePosition,
    /// Heading from the player to the exit in radians.
    pub heading: f32,
}

/// Everything drawn on the overlay for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Player position in tile space; every ray starts here.
    pub origin: TilePosition,
    /// Field-of-view rays, `ray_count + 1` of them.
    pub rays: Vec<RaySegment>,
    /// Guide line, when enabled.
    pub hint: Option<DirectionHint>,
}

impl OverlayFrame {
    /// Composes the overlay for `pose` on `map`.
    pub fn compose(map: &GridMap, pose: &Pose, config: &MinimapConfig) -> Self {
        let (width, height) = map.dimensions();
        let origin = pose.tile_position((width, height));
        let max_distance = width.max(height) as f32;
        let fov = deg_to_rad(config.fov_degrees);

        let rays = ray_headings(fan_center(pose.yaw), fov, config.ray_count)
            .map(|heading| RaySegment {
                heading,
                hit: raycast::cast(map, origin, heading, max_distance, config.ray_step),
            })
            .collect();

        let hint = config
            .show_direction_hint
            .then(|| coordinates::nearest_exit(map, origin))
            .flatten()
            .map(|exit| {
                let target = coordinates::cell_tile_position(exit, (width, height));
                DirectionHint {
                    target,
                    heading: coordinates::heading_between(origin, target),
                }
            });

        Self { origin, rays, hint }
    }

    /// Clears `surface` and draws the marker, the rays and the hint.
    pub fn draw(&self, surface: &mut dyn OverlaySurface, config: &MinimapConfig) {
        let scale = config.map_scale;
        let to_pixels = |p: TilePosition| (p.tx * scale, p.ty * scale);
        let origin = to_pixels(self.origin);

        surface.clear();
        surface.fill_rect(
            Rect::centered(origin.0, origin.1, config.marker_size, config.marker_size),
            MARKER_COLOR,
        );
        for ray in &self.rays {
            surface.stroke_line(origin, to_pixels(ray.hit.point), RAY_COLOR, RAY_WIDTH);
        }
        if let Some(hint) = &self.hint {
            surface.stroke_line(origin, to_pixels(hint.target), HINT_COLOR, HINT_WIDTH);
        }
    }
}
