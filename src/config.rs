//! Runtime configuration.
//!
//! One parameterized configuration covers every tuning knob of the walk:
//! movement magnitudes per input source, the minimap field of view and ray
//! density, and where levels come from. All fields have defaults, so a config
//! file only needs the values it wants to change.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::renderer::raycast;

/// Top-level configuration for a maze run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Movement magnitudes for each input source.
    pub movement: MovementConfig,
    /// Minimap overlay settings.
    pub minimap: MinimapConfig,
    /// Level source settings.
    pub levels: LevelConfig,
}

impl MazeConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|source| MazeError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value that has a restricted range.
    pub fn validate(&self) -> Result<()> {
        self.minimap.validate()
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Translation and rotation magnitudes per input source.
///
/// Translations are in world units per frame, rotations in radians per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance moved per frame while a movement key is held.
    pub key_translation: f32,
    /// Yaw change per frame while a turn key is held.
    pub key_rotation: f32,
    /// Distance moved per frame at full virtual-pad deflection.
    pub pad_translation: f32,
    /// Yaw change per frame at full virtual-pad deflection.
    pub pad_rotation: f32,
    /// Radians of yaw per pixel of horizontal mouse movement.
    pub mouse_sensitivity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            key_translation: 2.5,
            key_rotation: 0.01,
            pad_translation: 5.0,
            pad_rotation: 0.05,
            mouse_sensitivity: 0.001,
        }
    }
}

/// Minimap overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Width of the field-of-view fan in degrees.
    pub fov_degrees: f32,
    /// Number of subdivisions of the fan; `ray_count + 1` rays are drawn.
    pub ray_count: u32,
    /// Ray marching step in tile units.
    pub ray_step: f32,
    /// Pixels per grid cell on the minimap surface.
    pub map_scale: f32,
    /// Side length of the player marker in pixels.
    pub marker_size: f32,
    /// Draw a guide line from the player toward the nearest exit.
    pub show_direction_hint: bool,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 80.0,
            ray_count: 50,
            ray_step: raycast::DEFAULT_STEP,
            map_scale: 16.0,
            marker_size: 4.0,
            show_direction_hint: false,
        }
    }
}

impl MinimapConfig {
    /// Rejects values the ray marcher and the fan cannot work with.
    ///
    /// # Errors
    /// [`MazeError::InvalidConfig`] for a `ray_step` outside `(0, 1]`, a
    /// non-positive `map_scale`, or a `fov_degrees` outside `(0, 360)`.
    pub fn validate(&self) -> Result<()> {
        let in_range = |value: f32, low: f32, high: f32| value > low && value <= high;
        if !in_range(self.ray_step, 0.0, raycast::MAX_STEP) {
            return Err(invalid("minimap.ray_step", self.ray_step, "(0, 1]"));
        }
        if !in_range(self.map_scale, 0.0, f32::MAX) {
            return Err(invalid("minimap.map_scale", self.map_scale, "> 0"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 360.0) {
            return Err(invalid("minimap.fov_degrees", self.fov_degrees, "(0, 360)"));
        }
        if !(self.marker_size >= 0.0 && self.marker_size.is_finite()) {
            return Err(invalid("minimap.marker_size", self.marker_size, ">= 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: f32, expected: &'static str) -> MazeError {
    MazeError::InvalidConfig {
        field,
        value,
        expected,
    }
}

/// Where levels are read from and where the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Directory containing `maze3d-<n>.json` files.
    pub directory: PathBuf,
    /// Index of the first level played.
    pub first_level: u32,
    /// Number of levels in the run. Discovered from the directory when unset.
    pub count: Option<u32>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets/maps"),
            first_level: 1,
            count: None,
        }
    }
}
