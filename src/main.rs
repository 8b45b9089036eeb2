//! maze3d - headless maze walk
//!
//! Replays an intent script against the level set and logs what happens. This
//! exercises the whole navigation core (loading, movement, collision, level
//! transitions and the minimap) without a window.
//!
//! # Usage
//! ```text
//! maze3d [--config FILE] [--levels DIR] [--script SCRIPT] [--snapshot FILE.png]
//! ```
//!
//! A script is a whitespace-separated list of `<action><frames>` tokens:
//! `F` forward, `B` backward, `L` turn left, `R` turn right, `W` wait. For
//! example `F40 L157 B3 R10` walks forward for 40 frames, turns left for 157
//! frames, backs up for 3 and turns right for 10.
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use maze3d::game::keys::{GameKey, InputSource};
use maze3d::maze::loader::{DirectoryLevelSource, SequentialCatalog};
use maze3d::renderer::surface::ImageSurface;
use maze3d::{Game, MazeConfig, MazeError, Result, RunState, SessionEvent};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

const DEFAULT_SCRIPT: &str = "F40 L157 F40 R157 F40";
const COLLISION_SOUND: &str = "assets/audio/bump.wav";
/// Frames allowed to wait for a level to arrive once the script runs out.
const LOAD_GRACE_FRAMES: u32 = 10_000;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).compact().init();
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    levels: Option<PathBuf>,
    script: Option<String>,
    snapshot: Option<PathBuf>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> std::result::Result<Self, String> {
        let mut args = Args::default();
        while let Some(flag) = raw.next() {
            let mut value = || raw.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--config" => args.config = Some(value()?.into()),
                "--levels" => args.levels = Some(value()?.into()),
                "--script" => args.script = Some(value()?),
                "--snapshot" => args.snapshot = Some(value()?.into()),
                other => return Err(format!("unknown argument {other}")),
            }
        }
        Ok(args)
    }
}

/// One scripted action held for a number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Hold(GameKey, u32),
    Wait(u32),
}

fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split_whitespace()
        .map(|token| {
            let invalid = || MazeError::InvalidScript {
                token: token.to_string(),
            };
            let mut chars = token.chars();
            let action = chars.next().ok_or_else(invalid)?;
            let frames: u32 = chars.as_str().parse().map_err(|_| invalid())?;
            let step = match action.to_ascii_uppercase() {
                'F' => Step::Hold(GameKey::Forward, frames),
                'B' => Step::Hold(GameKey::Backward, frames),
                'L' => Step::Hold(GameKey::Left, frames),
                'R' => Step::Hold(GameKey::Right, frames),
                'W' => Step::Wait(frames),
                _ => return Err(invalid()),
            };
            Ok(step)
        })
        .collect()
}

fn build_game(args: &Args) -> Result<Game> {
    let mut config = match &args.config {
        Some(path) => MazeConfig::load(path)?,
        None => MazeConfig::default(),
    };
    if let Some(levels) = &args.levels {
        config.levels.directory = levels.clone();
    }

    let source = DirectoryLevelSource::new(&config.levels.directory);
    let count = config
        .levels
        .count
        .unwrap_or_else(|| source.discover_count());
    info!(
        directory = %config.levels.directory.display(),
        count,
        "level set"
    );

    let game = Game::new(
        config,
        Arc::new(source),
        Box::new(SequentialCatalog::new(count)),
    )?;
    let game = game.with_minimap(ImageSurface::new(0, 0), ImageSurface::new(0, 0));
    Ok(attach_audio(game))
}

#[cfg(feature = "audio")]
fn attach_audio(game: Game) -> Game {
    match maze3d::game::audio::KiraAudioSink::new(COLLISION_SOUND) {
        Ok(sink) => game.with_audio(Box::new(sink)),
        Err(e) => {
            warn!("audio disabled: {e}");
            game
        }
    }
}

#[cfg(not(feature = "audio"))]
fn attach_audio(game: Game) -> Game {
    warn!("built without the audio feature; {COLLISION_SOUND} will not play");
    game
}

fn log_events(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::Collision { .. } => {}
            SessionEvent::ExitReached { level } => info!(level, "exit reached"),
            SessionEvent::LevelLoaded { level } => info!(level, "now walking level"),
            SessionEvent::GameComplete => info!("all levels complete"),
        }
    }
}

fn run(args: Args) -> Result<()> {
    let script = parse_script(args.script.as_deref().unwrap_or(DEFAULT_SCRIPT))?;
    let mut game = build_game(&args)?;

    let mut collisions = 0usize;
    'script: for step in script {
        let (key, frames) = match step {
            Step::Hold(key, frames) => (Some(key), frames),
            Step::Wait(frames) => (None, frames),
        };
        if let Some(key) = key {
            game.input_mut().press_key(InputSource::Primary, key);
        }
        for _ in 0..frames {
            let output = game.frame()?;
            collisions += output.report.blocked;
            log_events(&output.events);
            if output.state.is_terminal() {
                break 'script;
            }
        }
        if let Some(key) = key {
            game.input_mut().release_key(InputSource::Primary, key);
        }
    }

    // Let an in-flight level load finish so the snapshot shows a settled map.
    let mut grace = LOAD_GRACE_FRAMES;
    while matches!(game.session().run_state(), RunState::Loading { .. }) && grace > 0 {
        log_events(&game.frame()?.events);
        std::thread::yield_now();
        grace -= 1;
    }

    let session = game.session();
    let pose = session.pose();
    info!(
        frames = game.frame_count,
        level = session.level(),
        state = ?session.run_state(),
        x = pose.x,
        z = pose.z,
        yaw = pose.yaw,
        collisions,
        "walk finished"
    );

    if let (Some(path), Some(layers)) = (&args.snapshot, game.minimap()) {
        layers.composite().save(path).map_err(|e| MazeError::Io {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;
        info!(path = %path.display(), "minimap snapshot written");
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();
    init_tracing();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
