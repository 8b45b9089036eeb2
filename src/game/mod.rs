//! Game state management module.
//!
//! [`Game`] is the per-frame driver. It owns the [`MazeSession`](session::MazeSession),
//! the input buffer, the level loader and the optional collaborators (audio
//! sink, minimap surfaces), and runs one update pass per call to
//! [`Game::frame`]:
//!
//! 1. Snapshot input and resolve movement (only while running)
//! 2. Advance the level lifecycle (request or install the next level)
//! 3. Dispatch events to the audio sink
//! 4. Redraw the minimap overlay

pub mod audio;
pub mod collision;
pub mod keys;
pub mod pose;
pub mod session;
pub mod state;

use std::sync::Arc;

use tracing::{debug, info};

use self::audio::AudioSink;
use self::keys::InputState;
use self::session::{FrameReport, MazeSession, SessionEvent};
use self::state::RunState;
use crate::config::MazeConfig;
use crate::error::Result;
use crate::maze::loader::{BackgroundLoader, LevelCatalog, LevelSource};
use crate::renderer::minimap::{self, OverlayFrame};
use crate::renderer::surface::{ImageSurface, OverlaySurface};

/// The two minimap surfaces: the static map, drawn once per level, and the
/// overlay, redrawn every frame.
#[derive(Debug, Clone)]
pub struct MinimapLayers<S> {
    pub map: S,
    pub overlay: S,
}

impl MinimapLayers<ImageSurface> {
    /// Flattens the overlay onto the static map.
    pub fn composite(&self) -> ImageSurface {
        let mut out = self.map.clone();
        out.overlay(&self.overlay);
        out
    }
}

/// What one call to [`Game::frame`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Run state after the frame.
    pub state: RunState,
    /// Movement summary; empty when movement did not run.
    pub report: FrameReport,
    /// Events raised during the frame, in order.
    pub events: Vec<SessionEvent>,
}

/// Drives a run from the first level to the last.
pub struct Game<S: OverlaySurface = ImageSurface> {
    /// Tuning for movement and the minimap.
    pub config: MazeConfig,
    session: MazeSession,
    input: InputState,
    loader: BackgroundLoader,
    catalog: Box<dyn LevelCatalog>,
    audio: Option<Box<dyn AudioSink>>,
    minimap: Option<MinimapLayers<S>>,
    touching_wall: bool,
    /// Number of frames run since start.
    pub frame_count: u64,
}

impl<S: OverlaySurface> Game<S> {
    /// Loads the first level synchronously and starts the run.
    ///
    /// # Arguments
    ///
    /// * `config` - Movement, minimap and level settings
    /// * `source` - Where level maps come from
    /// * `catalog` - Level sequencing
    ///
    /// # Returns
    ///
    /// An error if the configuration is out of range or the first level
    /// cannot be loaded.
    pub fn new(
        config: MazeConfig,
        source: Arc<dyn LevelSource>,
        catalog: Box<dyn LevelCatalog>,
    ) -> Result<Self> {
        config.validate()?;
        let loader = BackgroundLoader::new(source);
        let map = loader.load_now(config.levels.first_level)?;
        info!(level = map.level(), "run started");

        Ok(Self {
            config,
            session: MazeSession::new(map),
            input: InputState::new(),
            loader,
            catalog,
            audio: None,
            minimap: None,
            touching_wall: false,
            frame_count: 0,
        })
    }

    /// Attaches an audio sink for collision cues.
    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = Some(sink);
        self
    }

    /// Attaches minimap surfaces and draws the static layer.
    pub fn with_minimap(mut self, map: S, overlay: S) -> Self {
        let mut layers = MinimapLayers { map, overlay };
        minimap::draw_static(
            self.session.map(),
            self.config.minimap.map_scale,
            &mut layers.map,
        );
        self.minimap = Some(layers);
        self.redraw_overlay();
        self
    }

    /// Input buffer for event callbacks.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// The live session, for the renderer.
    pub fn session(&self) -> &MazeSession {
        &self.session
    }

    /// The minimap surfaces, if attached.
    pub fn minimap(&self) -> Option<&MinimapLayers<S>> {
        self.minimap.as_ref()
    }

    /// Runs one update pass.
    ///
    /// # Returns
    ///
    /// The frame's outcome, or the load error if the next level could not be
    /// loaded. A load error ends the run.
    pub fn frame(&mut self) -> Result<FrameOutput> {
        self.frame_count += 1;

        let mut report = FrameReport::default();
        match self.session.run_state() {
            RunState::Running => {
                let snapshot = self.input.snapshot();
                report = self.session.frame(
                    &snapshot,
                    &self.config.movement,
                    self.catalog.as_ref(),
                );
            }
            RunState::Loading { .. } => self.poll_loader()?,
            RunState::LevelComplete { .. } | RunState::GameComplete => {}
        }

        if let RunState::LevelComplete { .. } = self.session.run_state() {
            if let Some(next) = self.session.request_next_level(self.catalog.as_ref()) {
                self.loader.request(next);
            }
        }

        let events = self.session.drain_events();
        self.dispatch_audio(&events);
        if self.session.run_state().is_running() {
            self.redraw_overlay();
        }

        Ok(FrameOutput {
            state: self.session.run_state(),
            report,
            events,
        })
    }

    fn poll_loader(&mut self) -> Result<()> {
        let Some(result) = self.loader.poll() else {
            return Ok(());
        };
        let map = result?;
        if self.session.install_level(map) {
            if let Some(layers) = self.minimap.as_mut() {
                minimap::draw_static(
                    self.session.map(),
                    self.config.minimap.map_scale,
                    &mut layers.map,
                );
            }
            self.touching_wall = false;
        }
        Ok(())
    }

    /// Plays the bump cue once per wall contact rather than every frame the
    /// wall is pushed against.
    fn dispatch_audio(&mut self, events: &[SessionEvent]) {
        let collided = events
            .iter()
            .any(|event| matches!(event, SessionEvent::Collision { .. }));
        let starts_contact = collided && !self.touching_wall;
        self.touching_wall = collided;
        if !starts_contact {
            return;
        }
        match self.audio.as_mut() {
            Some(sink) => sink.play_collision(),
            None => debug!("no audio sink attached; collision cue skipped"),
        }
    }

    fn redraw_overlay(&mut self) {
        let Some(layers) = self.minimap.as_mut() else {
            return;
        };
        let frame = OverlayFrame::compose(
            self.session.map(),
            &self.session.pose(),
            &self.config.minimap,
        );
        frame.draw(&mut layers.overlay, &self.config.minimap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;
    use crate::game::keys::{GameKey, InputSource};
    use crate::maze::GridMap;
    use crate::maze::loader::SequentialCatalog;
    use crate::renderer::surface::RecordingSurface;
    use std::cell::Cell as Counter;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Levels kept in memory, keyed by index.
    struct MemorySource(HashMap<u32, &'static str>);

    impl LevelSource for MemorySource {
        fn load(&self, index: u32) -> Result<GridMap> {
            match self.0.get(&index) {
                Some(raw) => GridMap::parse(index, raw),
                None => Err(MazeError::LevelNotFound {
                    level: index,
                    path: format!("memory/{index}").into(),
                }),
            }
        }
    }

    struct CountingSink(Rc<Counter<usize>>);

    impl AudioSink for CountingSink {
        fn play_collision(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Level 1: the exit sits straight ahead of the start.
    const STRAIGHT: &str = r#"[[2,"A",2],[2,1,2],[2,"D",2],[2,2,2]]"#;
    const SCENARIO: &str = r#"[[2,2,2],[2,"D",2],[2,2,"A"]]"#;

    fn game(levels: &[(u32, &'static str)], count: u32) -> Game<RecordingSurface> {
        let source = MemorySource(levels.iter().copied().collect());
        Game::new(
            MazeConfig::default(),
            Arc::new(source),
            Box::new(SequentialCatalog::new(count)),
        )
        .unwrap()
    }

    fn run_until(
        game: &mut Game<RecordingSurface>,
        done: impl Fn(&FrameOutput) -> bool,
    ) -> Vec<SessionEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        loop {
            let output = game.frame().unwrap();
            events.extend(output.events.iter().copied());
            if done(&output) {
                return events;
            }
            assert!(Instant::now() < deadline, "condition never reached");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_run_advances_through_levels() {
        let mut game = game(&[(1, STRAIGHT), (2, STRAIGHT)], 2);
        game.input_mut().press_key(InputSource::Primary, GameKey::Forward);

        let events =
            run_until(&mut game, |out| matches!(out.state, RunState::Loading { level: 2 }));
        assert!(events.contains(&SessionEvent::ExitReached { level: 1 }));

        let events = run_until(&mut game, |out| out.state.is_running());
        assert!(events.contains(&SessionEvent::LevelLoaded { level: 2 }));
        assert_eq!(game.session().level(), 2);

        let events = run_until(&mut game, |out| out.state.is_terminal());
        assert_eq!(events.last(), Some(&SessionEvent::GameComplete));

        // Terminal: further frames do nothing.
        let output = game.frame().unwrap();
        assert_eq!(output.state, RunState::GameComplete);
        assert!(output.events.is_empty());
    }

    #[test]
    fn test_missing_next_level_is_fatal() {
        let mut game = game(&[(1, STRAIGHT)], 3);
        game.input_mut().press_key(InputSource::Supplementary, GameKey::Forward);

        let deadline = Instant::now() + Duration::from_secs(5);
        let err = loop {
            match game.frame() {
                Ok(_) => {
                    assert!(Instant::now() < deadline, "load never failed");
                    thread::sleep(Duration::from_millis(1));
                }
                Err(err) => break err,
            }
        };
        assert!(matches!(err, MazeError::LevelNotFound { level: 2, .. }));
    }

    #[test]
    fn test_collision_cue_plays_once_per_contact() {
        let plays = Rc::new(Counter::new(0));
        let mut game =
            game(&[(1, SCENARIO)], 1).with_audio(Box::new(CountingSink(plays.clone())));

        game.input_mut().press_key(InputSource::Primary, GameKey::Forward);
        for _ in 0..40 {
            game.frame().unwrap();
        }
        assert_eq!(plays.get(), 1);

        game.input_mut().release_key(InputSource::Primary, GameKey::Forward);
        game.frame().unwrap();
        game.input_mut().press_key(InputSource::Primary, GameKey::Forward);
        game.frame().unwrap();
        assert_eq!(plays.get(), 2);
    }

    #[test]
    fn test_overlay_redrawn_each_running_frame() {
        let mut game = game(&[(1, SCENARIO)], 1)
            .with_minimap(RecordingSurface::new(0, 0), RecordingSurface::new(0, 0));

        let layers = game.minimap().unwrap();
        assert_eq!(layers.map.size(), (48, 48));
        assert_eq!(layers.overlay.lines().count(), 51);

        game.input_mut().mouse_motion(100.0);
        game.frame().unwrap();
        let layers = game.minimap().unwrap();
        assert_eq!(layers.overlay.lines().count(), 51);
        assert!((game.session().pose().yaw + 0.1).abs() < 1e-6);
    }
}
