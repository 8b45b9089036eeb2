//! Error types shared across the crate.
//!
//! Level loading is the only place where errors are fatal: a malformed map is
//! rejected before any session state is built from it. Everything that happens
//! inside a frame (clamped lookups, terminated rays, missing collaborators) is
//! handled without producing an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T, E = MazeError> = std::result::Result<T, E>;

/// Everything that can go wrong while loading levels or configuration.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Reading a file from disk failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The level document is not valid JSON or does not have the row/column shape.
    #[error("level {level} is not a valid level document: {source}")]
    Json {
        level: u32,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration document could not be parsed.
    #[error("config {} could not be parsed: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The level has no rows or its first row has no cells.
    #[error("level {level} has no cells")]
    EmptyMap { level: u32 },

    /// A row does not have the same length as the first row.
    #[error("level {level} row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        level: u32,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell holds a string marker other than the start or exit marker.
    #[error("level {level} has unknown cell code {code:?} at row {row}, column {col}")]
    InvalidCell {
        level: u32,
        row: usize,
        col: usize,
        code: String,
    },

    /// The level does not contain a start cell.
    #[error("level {level} has no start cell")]
    MissingStart { level: u32 },

    /// The level contains more than one start cell.
    #[error("level {level} has {count} start cells, expected exactly one")]
    MultipleStarts { level: u32, count: usize },

    /// The level does not contain an exit cell.
    #[error("level {level} has no exit cell")]
    MissingExit { level: u32 },

    /// No level file exists for the requested index.
    #[error("level {level} not found at {}", .path.display())]
    LevelNotFound { level: u32, path: PathBuf },

    /// The background loader thread went away before delivering a level.
    #[error("level loader stopped before delivering level {level}")]
    LoaderDisconnected { level: u32 },

    /// A configuration value is outside the range it is accepted in.
    #[error("config value {field} = {value} is out of range, expected {expected}")]
    InvalidConfig {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// An intent script token could not be understood.
    #[error("invalid script token {token:?}")]
    InvalidScript { token: String },
}
