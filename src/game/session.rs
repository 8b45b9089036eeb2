//! Per-run session state.
//!
//! [`MazeSession`] owns the live grid map, the viewpoint pose and the run
//! state. It is the only place these are mutated, always from inside the
//! per-frame update. Several sessions can exist side by side, which is how the
//! tests run independent levels in isolation.

use tracing::{debug, info};

use crate::config::MovementConfig;
use crate::game::collision::{self, Intent, MoveOutcome};
use crate::game::keys::InputSnapshot;
use crate::game::pose::Pose;
use crate::game::state::RunState;
use crate::maze::loader::LevelCatalog;
use crate::maze::{Cell, GridMap};

/// Something observable that happened during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A move was rejected by a wall; the audio backend plays the bump cue.
    Collision { cell: Cell },
    /// The viewpoint entered an exit cell of `level`.
    ExitReached { level: u32 },
    /// `level` was installed and the run resumed.
    LevelLoaded { level: u32 },
    /// The final level was finished.
    GameComplete,
}

/// Summary of one frame's movement pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Intents that were applied, blocked or not.
    pub applied: usize,
    /// Intents rejected by walls.
    pub blocked: usize,
    /// An exit was reached this frame.
    pub reached_exit: bool,
}

/// Map, pose and run state for one run.
#[derive(Debug, Clone)]
pub struct MazeSession {
    map: GridMap,
    pose: Pose,
    state: RunState,
    events: Vec<SessionEvent>,
}

impl MazeSession {
    /// Starts a session on `map` with the viewpoint at the start cell.
    pub fn new(map: GridMap) -> Self {
        let pose = Pose::at_start(&map);
        Self {
            map,
            pose,
            state: RunState::Running,
            events: Vec::new(),
        }
    }

    /// The live map.
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// The current viewpoint pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// The current run state.
    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Index of the level being walked (or just finished).
    pub fn level(&self) -> u32 {
        self.map.level()
    }

    /// 3D camera position for the renderer.
    pub fn eye_position(&self) -> [f32; 3] {
        self.pose.eye_position()
    }

    /// Applies one intent. Ignored unless the session is running.
    pub fn apply(
        &mut self,
        intent: Intent,
        magnitude: f32,
        catalog: &dyn LevelCatalog,
    ) -> Option<MoveOutcome> {
        if !self.state.is_running() {
            return None;
        }

        let outcome = collision::try_move(&self.map, &self.pose, intent, magnitude);
        if outcome.blocked {
            let cell = outcome.cell;
            debug!(row = cell.row, col = cell.col, "movement blocked");
            self.events.push(SessionEvent::Collision { cell });
            return Some(outcome);
        }

        self.pose = outcome.pose;
        if outcome.reached_exit {
            let level = self.level();
            self.state = self.state.on_exit_reached(level, catalog);
            info!(level, "exit reached");
            self.events.push(SessionEvent::ExitReached { level });
            if self.state.is_terminal() {
                info!(level, "final level complete");
                self.events.push(SessionEvent::GameComplete);
            }
        }
        Some(outcome)
    }

    /// Runs the movement pass for one frame.
    ///
    /// Intents are applied in order until the run leaves [`RunState::Running`];
    /// anything left after an exit is reached is dropped.
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        config: &MovementConfig,
        catalog: &dyn LevelCatalog,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        for (intent, magnitude) in input.intents(config) {
            let Some(outcome) = self.apply(intent, magnitude, catalog) else {
                break;
            };
            report.applied += 1;
            report.blocked += usize::from(outcome.blocked);
            report.reached_exit |= outcome.reached_exit;
        }
        report
    }

    /// Moves from [`RunState::LevelComplete`] to [`RunState::Loading`] and
    /// returns the level to load.
    pub fn request_next_level(&mut self, catalog: &dyn LevelCatalog) -> Option<u32> {
        self.state = self.state.on_load_requested(catalog);
        match self.state {
            RunState::Loading { level } => Some(level),
            _ => None,
        }
    }

    /// Installs a freshly loaded map and resumes the run.
    ///
    /// The previous map is dropped and the viewpoint respawns at the new start
    /// cell. Returns `false` if no load was outstanding.
    pub fn install_level(&mut self, map: GridMap) -> bool {
        if !matches!(self.state, RunState::Loading { .. }) {
            return false;
        }
        let level = map.level();
        self.pose = Pose::at_start(&map);
        self.map = map;
        self.state = self.state.on_level_loaded();
        info!(level, "level started");
        self.events.push(SessionEvent::LevelLoaded { level });
        true
    }

    /// Takes the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
