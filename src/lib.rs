//! maze3d - navigation core for a first-person grid maze
//!
//! Levels are rectangular grids of open cells, walls, one start cell and one
//! or more exits. A viewpoint walks the grid in continuous world coordinates;
//! every move is checked against the grid before it is committed, a minimap
//! overlay shows the player's field of view, and reaching an exit advances to
//! the next level.
//!
//! # Architecture
//! - `maze/`: grid map model, level parsing and loading
//! - `math/`: world, tile and grid coordinate transforms
//! - `game/`: movement resolution, input, run state and the frame driver
//! - `renderer/`: ray marching and the minimap overlay
//! - `config`, `error`: runtime settings and the crate error type

pub mod config;
pub mod error;
pub mod game;
pub mod math;
pub mod maze;
pub mod renderer;

pub use config::MazeConfig;
pub use error::{MazeError, Result};
pub use game::Game;
pub use game::session::{MazeSession, SessionEvent};
pub use game::state::RunState;
pub use maze::{Cell, CellKind, GridMap};
