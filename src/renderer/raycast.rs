//! Fixed-step 2D ray marching over the grid.
//!
//! Rays are sampled every `step` tile units. This is an approximation of a
//! proper grid traversal and is only used for the schematic minimap. With a
//! step of 0.05 and cells one tile wide, no step can jump across a wall.

use crate::math::coordinates::TilePosition;
use crate::maze::GridMap;

/// Step used by the minimap.
pub const DEFAULT_STEP: f32 = 0.05;
/// Longest step that still samples every cell a ray crosses along an axis.
pub const MAX_STEP: f32 = 1.0;

/// Why a ray stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayStop {
    /// The next sample fell inside a wall cell.
    Wall,
    /// The next sample left the grid.
    OutOfBounds,
    /// The ray travelled its maximum distance.
    MaxDistance,
}

/// Terminal point of a cast ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Last in-bounds, non-wall sample.
    pub point: TilePosition,
    /// Distance from the origin to `point` in tile units.
    pub distance: f32,
    /// Number of samples examined.
    pub steps: usize,
    /// Why the ray stopped.
    pub stop: RayStop,
}

/// Marches a ray from `origin` along `angle` (radians, `0` along `+tx`,
/// `π/2` along `+ty`).
///
/// The sample that enters a wall or leaves the grid is excluded from the
/// result, so the returned point is never inside a wall. A ray whose origin is
/// already blocked returns the origin with zero distance.
///
/// `step` is clamped to at most one tile so no wall can be skipped; a step
/// that is not positive falls back to [`DEFAULT_STEP`].
///
/// # Returns
///
/// The hit after at most `max_distance / step + 1` samples.
pub fn cast(
    map: &GridMap,
    origin: TilePosition,
    angle: f32,
    max_distance: f32,
    step: f32,
) -> RayHit {
    let dims = map.dimensions();
    let step = if step > 0.0 {
        step.min(MAX_STEP)
    } else {
        DEFAULT_STEP
    };
    let (dx, dy) = (angle.cos(), angle.sin());
    let max_steps = (max_distance / step).floor().max(0.0) as usize;

    let mut last = origin;
    let mut taken = 0;
    let mut samples = 0;
    let stop = loop {
        let point = TilePosition::new(
            origin.tx + dx * step * taken as f32,
            origin.ty + dy * step * taken as f32,
        );
        samples += 1;

        let Some(cell) = point.cell(dims) else {
            break RayStop::OutOfBounds;
        };
        if map.is_wall(cell) {
            break RayStop::Wall;
        }
        last = point;
        if taken >= max_steps {
            break RayStop::MaxDistance;
        }
        taken += 1;
    };

    RayHit {
        point: last,
        distance: origin.distance(last),
        steps: samples,
        stop,
    }
}
