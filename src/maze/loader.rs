//! Level loading and sequencing.
//!
//! Levels are fetched by numeric index from a [`LevelSource`]. A
//! [`LevelCatalog`] answers which level follows the current one and whether
//! the current one is the last. [`BackgroundLoader`] moves loading off the
//! frame loop so a frame never blocks on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info};

use super::GridMap;
use crate::error::{MazeError, Result};

/// Supplies validated grid maps by level index.
pub trait LevelSource: Send + Sync {
    /// Loads and validates level `index`.
    fn load(&self, index: u32) -> Result<GridMap>;
}

/// Answers sequencing questions about the run.
pub trait LevelCatalog {
    /// Whether finishing `index` ends the run.
    fn is_final(&self, index: u32) -> bool;

    /// The level played after `index`.
    fn next(&self, index: u32) -> u32;
}

/// Reads `maze3d-<index>.json` files from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryLevelSource {
    directory: PathBuf,
}

impl DirectoryLevelSource {
    /// Creates a source rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the file holding level `index`.
    pub fn level_path(&self, index: u32) -> PathBuf {
        level_path(&self.directory, index)
    }

    /// Counts consecutive level files starting at level 1.
    pub fn discover_count(&self) -> u32 {
        let mut count = 0;
        while self.level_path(count + 1).is_file() {
            count += 1;
        }
        debug!(directory = %self.directory.display(), count, "discovered levels");
        count
    }
}

impl LevelSource for DirectoryLevelSource {
    fn load(&self, index: u32) -> Result<GridMap> {
        let path = self.level_path(index);
        let raw = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => MazeError::LevelNotFound {
                level: index,
                path: path.clone(),
            },
            _ => MazeError::Io {
                path: path.clone(),
                source,
            },
        })?;
        let map = GridMap::parse(index, &raw)?;
        info!(
            level = index,
            width = map.width(),
            height = map.height(),
            "level loaded"
        );
        Ok(map)
    }
}

fn level_path(directory: &Path, index: u32) -> PathBuf {
    directory.join(format!("maze3d-{index}.json"))
}

/// A run of `count` levels numbered `1..=count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialCatalog {
    count: u32,
}

impl SequentialCatalog {
    /// Creates a catalog of `count` levels.
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    /// Number of levels in the run.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl LevelCatalog for SequentialCatalog {
    fn is_final(&self, index: u32) -> bool {
        index >= self.count
    }

    fn next(&self, index: u32) -> u32 {
        index + 1
    }
}

/// Loads levels on a worker thread and hands them back when polled.
///
/// Only one load is outstanding at a time; requesting a new level while one is
/// pending replaces the pending request.
pub struct BackgroundLoader {
    source: Arc<dyn LevelSource>,
    pending: Option<PendingLoad>,
}

struct PendingLoad {
    level: u32,
    receiver: Receiver<Result<GridMap>>,
}

impl BackgroundLoader {
    /// Wraps a level source.
    pub fn new(source: Arc<dyn LevelSource>) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    /// Starts loading `level` on a worker thread.
    pub fn request(&mut self, level: u32) {
        let (sender, receiver) = mpsc::channel();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            // The receiver may already be gone if the request was replaced.
            let _ = sender.send(source.load(level));
        });
        debug!(level, "level load requested");
        self.pending = Some(PendingLoad { level, receiver });
    }

    /// Whether a load is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the finished load, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Result<GridMap>> {
        let pending = self.pending.as_ref()?;
        let outcome = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(MazeError::LoaderDisconnected {
                level: pending.level,
            }),
        };
        self.pending = None;
        Some(outcome)
    }

    /// Loads `level` on the calling thread, bypassing the worker.
    pub fn load_now(&self, level: u32) -> Result<GridMap> {
        self.source.load(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn temp_level_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("maze3d-loader-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn wait_for(loader: &mut BackgroundLoader) -> Result<GridMap> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "load never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_directory_source_and_discovery() {
        let dir = temp_level_dir("discover");
        fs::write(dir.join("maze3d-1.json"), r#"[["D",1,"A"]]"#).unwrap();
        fs::write(dir.join("maze3d-2.json"), r#"[["A",1,"D"]]"#).unwrap();
        fs::write(dir.join("maze3d-4.json"), r#"[["A",1,"D"]]"#).unwrap();

        let source = DirectoryLevelSource::new(&dir);
        assert_eq!(source.discover_count(), 2);

        let map = source.load(2).unwrap();
        assert_eq!(map.level(), 2);
        assert_eq!(map.dimensions(), (3, 1));

        let missing = source.load(3).unwrap_err();
        assert!(matches!(missing, MazeError::LevelNotFound { level: 3, .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bundled_levels_are_valid() {
        let source =
            DirectoryLevelSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/maps"));
        let count = source.discover_count();
        assert_eq!(count, 3);
        for level in 1..=count {
            source.load(level).unwrap();
        }
    }

    #[test]
    fn test_sequential_catalog() {
        let catalog = SequentialCatalog::new(3);
        assert!(!catalog.is_final(1));
        assert!(!catalog.is_final(2));
        assert!(catalog.is_final(3));
        assert_eq!(catalog.next(2), 3);
    }

    #[test]
    fn test_background_loader_delivers_result_once() {
        let dir = temp_level_dir("background");
        fs::write(dir.join("maze3d-1.json"), r#"[["D",1,"A"]]"#).unwrap();

        let mut loader = BackgroundLoader::new(Arc::new(DirectoryLevelSource::new(&dir)));
        assert!(loader.poll().is_none());

        loader.request(1);
        assert!(loader.is_pending());
        let map = wait_for(&mut loader).unwrap();
        assert_eq!(map.start().col, 0);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());

        loader.request(7);
        let err = wait_for(&mut loader).unwrap_err();
        assert!(matches!(err, MazeError::LevelNotFound { level: 7, .. }));

        fs::remove_dir_all(&dir).unwrap();
    }
}
