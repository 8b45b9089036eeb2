//! Level/run lifecycle.
//!
//! ```text
//!            exit, not final             load requested        level loaded
//! Running ───────────────────▶ LevelComplete ───────▶ Loading ───────────▶ Running
//!    │
//!    │ exit, final level
//!    ▼
//! GameComplete (terminal)
//! ```

use crate::maze::loader::LevelCatalog;

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// A level is being walked; the frame loop applies movement.
    Running,
    /// The exit of `level` was reached and the next level has not been requested.
    LevelComplete { level: u32 },
    /// Waiting for `level` to arrive from the loader.
    Loading { level: u32 },
    /// The final level was finished.
    GameComplete,
}

impl RunState {
    /// Whether movement and overlay work should run this frame.
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Whether the run is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::GameComplete)
    }

    /// Transition taken when the viewpoint enters an exit cell of `level`.
    pub fn on_exit_reached(self, level: u32, catalog: &dyn LevelCatalog) -> Self {
        match self {
            RunState::Running if catalog.is_final(level) => RunState::GameComplete,
            RunState::Running => RunState::LevelComplete { level },
            other => other,
        }
    }

    /// Transition taken when the next level is requested from the loader.
    pub fn on_load_requested(self, catalog: &dyn LevelCatalog) -> Self {
        match self {
            RunState::LevelComplete { level } => RunState::Loading {
                level: catalog.next(level),
            },
            other => other,
        }
    }

    /// Transition taken when the requested level has been installed.
    pub fn on_level_loaded(self) -> Self {
        match self {
            RunState::Loading { .. } => RunState::Running,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::loader::SequentialCatalog;

    #[test]
    fn test_full_cycle_through_levels() {
        let catalog = SequentialCatalog::new(2);

        let state = RunState::Running.on_exit_reached(1, &catalog);
        assert_eq!(state, RunState::LevelComplete { level: 1 });
        assert!(!state.is_running());

        let state = state.on_load_requested(&catalog);
        assert_eq!(state, RunState::Loading { level: 2 });

        let state = state.on_level_loaded();
        assert_eq!(state, RunState::Running);

        let state = state.on_exit_reached(2, &catalog);
        assert_eq!(state, RunState::GameComplete);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let catalog = SequentialCatalog::new(3);
        assert_eq!(RunState::Running.on_level_loaded(), RunState::Running);
        assert_eq!(
            RunState::Running.on_load_requested(&catalog),
            RunState::Running
        );
        assert_eq!(
            RunState::GameComplete.on_exit_reached(1, &catalog),
            RunState::GameComplete
        );
        assert_eq!(
            RunState::Loading { level: 2 }.on_exit_reached(2, &catalog),
            RunState::Loading { level: 2 }
        );
    }
}
