//! Grid collision and movement resolution.
//!
//! # Overview
//!
//! Movement is resolved one intent at a time against the grid map:
//!
//! 1. A candidate pose is computed from the current pose and the intent
//! 2. Translation candidates are mapped to a grid cell with the lookahead bias
//!    (see [`movement_cell`](crate::math::coordinates::movement_cell))
//! 3. Wall cells reject the move; exit cells accept it and report the exit
//! 4. Accepted moves commit rotation and translation together
//!
//! Rotations never collide. There is no sliding: a blocked move leaves the pose
//! exactly as it was.

use crate::game::pose::Pose;
use crate::math::coordinates;
use crate::maze::{Cell, CellKind, GridMap};

/// A single movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Move along the facing direction.
    Forward,
    /// Move against the facing direction.
    Backward,
    /// Turn counterclockwise (yaw increases).
    TurnLeft,
    /// Turn clockwise (yaw decreases).
    TurnRight,
}

impl Intent {
    /// Whether this intent changes position rather than yaw.
    pub fn is_translation(self) -> bool {
        matches!(self, Intent::Forward | Intent::Backward)
    }
}

/// Result of resolving one intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Pose after the move; equal to the input pose when blocked.
    pub pose: Pose,
    /// The candidate cell was a wall and the move was rejected.
    pub blocked: bool,
    /// The candidate cell was an exit.
    pub reached_exit: bool,
    /// Cell the candidate pose was tested against.
    pub cell: Cell,
}

/// Grid cell the collision test uses for a pose on `map`.
pub fn collision_cell(map: &GridMap, pose: &Pose) -> Cell {
    let dims = map.dimensions();
    coordinates::movement_cell(coordinates::world_origin(dims), (pose.x, pose.z), dims)
}

/// Applies `intent` to `pose`, rejecting moves into wall cells.
///
/// # Arguments
///
/// * `map` - The current level
/// * `pose` - The pose before the move
/// * `intent` - What to do
/// * `magnitude` - World units for translations, radians for rotations
///
/// # Returns
///
/// The resolved [`MoveOutcome`]. Calling this again with the same blocked
/// intent keeps returning the same unchanged pose.
pub fn try_move(map: &GridMap, pose: &Pose, intent: Intent, magnitude: f32) -> MoveOutcome {
    let candidate = match intent {
        Intent::Forward => pose.translated(magnitude),
        Intent::Backward => pose.translated(-magnitude),
        Intent::TurnLeft => pose.rotated(magnitude),
        Intent::TurnRight => pose.rotated(-magnitude),
    };

    let cell = collision_cell(map, &candidate);
    if !intent.is_translation() {
        return MoveOutcome {
            pose: candidate,
            blocked: false,
            reached_exit: false,
            cell,
        };
    }

    // movement_cell clamps into the grid, so the lookup always hits a cell.
    match map.get(cell).unwrap_or(CellKind::Open) {
        CellKind::Wall(_) => MoveOutcome {
            pose: *pose,
            blocked: true,
            reached_exit: false,
            cell,
        },
        CellKind::Exit => MoveOutcome {
            pose: candidate,
            blocked: false,
            reached_exit: true,
            cell,
        },
        CellKind::Open | CellKind::Start => MoveOutcome {
            pose: candidate,
            blocked: false,
            reached_exit: false,
            cell,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, PI};

    /// `[[2,2,2],[2,"D",2],[2,2,"A"]]` with an opening so the exit is reachable.
    const SCENARIO: &str = r#"[[2,2,2],[2,"D",1],[2,2,"A"]]"#;

    const CORRIDOR: &str = r#"[
        [2,2,2,2,2,2,2],
        [2,"D",1,1,1,1,2],
        [2,1,2,2,2,1,2],
        [2,1,1,1,2,1,2],
        [2,2,2,1,1,"A",2],
        [2,2,2,2,2,2,2]
    ]"#;

    fn face(yaw: f32, map: &GridMap) -> Pose {
        Pose {
            yaw,
            ..Pose::at_start(map)
        }
    }

    #[test]
    fn test_walking_into_wall_is_blocked() {
        let map = GridMap::parse(1, SCENARIO).unwrap();
        // Yaw 0 faces -z, toward row 0 which is wall.
        let start = face(0.0, &map);

        let mut pose = start;
        let mut blocked = None;
        for _ in 0..100 {
            let outcome = try_move(&map, &pose, Intent::Forward, 2.5);
            if outcome.blocked {
                blocked = Some(outcome);
                break;
            }
            pose = outcome.pose;
        }

        let outcome = blocked.expect("wall never reached");
        assert_eq!(outcome.pose, pose);
        assert!(!outcome.reached_exit);
        assert_eq!(outcome.cell, Cell::new(0, 1));
        assert_ne!(collision_cell(&map, &pose), Cell::new(0, 1));
    }

    #[test]
    fn test_blocked_move_is_idempotent() {
        let map = GridMap::parse(1, SCENARIO).unwrap();
        let mut pose = face(0.0, &map);
        while !try_move(&map, &pose, Intent::Forward, 10.0).blocked {
            pose = try_move(&map, &pose, Intent::Forward, 10.0).pose;
        }

        for _ in 0..10 {
            let outcome = try_move(&map, &pose, Intent::Forward, 10.0);
            assert!(outcome.blocked);
            assert_eq!(outcome.pose, pose);
        }
    }

    #[test]
    fn test_rotation_never_blocked() {
        let map = GridMap::parse(1, SCENARIO).unwrap();
        let pose = face(0.0, &map);

        let left = try_move(&map, &pose, Intent::TurnLeft, 0.01);
        assert!(!left.blocked);
        assert!((left.pose.yaw - 0.01).abs() < 1e-7);
        assert_eq!((left.pose.x, left.pose.z), (pose.x, pose.z));

        let right = try_move(&map, &pose, Intent::TurnRight, 0.05);
        assert!((right.pose.yaw + 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_reaching_exit_is_reported() {
        let map = GridMap::parse(1, SCENARIO).unwrap();
        // Head east (+x) along row 1, then south (+z) into the exit.
        let mut pose = face(-FRAC_PI_2, &map);
        for _ in 0..40 {
            let outcome = try_move(&map, &pose, Intent::Forward, 2.5);
            assert!(!outcome.reached_exit);
            if outcome.blocked {
                break;
            }
            pose = outcome.pose;
        }
        assert_eq!(collision_cell(&map, &pose), Cell::new(1, 2));

        pose.yaw = PI;
        let mut reached = false;
        for _ in 0..40 {
            let outcome = try_move(&map, &pose, Intent::Forward, 2.5);
            assert!(!outcome.blocked);
            pose = outcome.pose;
            if outcome.reached_exit {
                reached = true;
                break;
            }
        }
        assert!(reached);
        assert_eq!(collision_cell(&map, &pose), Cell::new(2, 2));
    }

    /// The invariant holds for the lookahead cell. The minimap tile position is
    /// offset from it and can sit inside a wall.
    #[test]
    fn test_random_walk_never_ends_in_wall() {
        let map = GridMap::parse(1, CORRIDOR).unwrap();
        let mut rng = StdRng::seed_from_u64(0x6d617a65);

        for _ in 0..20 {
            let mut pose = Pose::at_start(&map);
            for _ in 0..2_000 {
                let (intent, magnitude) = match rng.gen_range(0..4) {
                    0 => (Intent::Forward, rng.gen_range(0.5..12.0)),
                    1 => (Intent::Backward, rng.gen_range(0.5..12.0)),
                    2 => (Intent::TurnLeft, rng.gen_range(0.0..0.8)),
                    _ => (Intent::TurnRight, rng.gen_range(0.0..0.8)),
                };
                let outcome = try_move(&map, &pose, intent, magnitude);
                if outcome.blocked {
                    assert_eq!(outcome.pose, pose);
                }
                pose = outcome.pose;
                assert!(!map.is_wall(collision_cell(&map, &pose)));
            }
        }
    }
}
