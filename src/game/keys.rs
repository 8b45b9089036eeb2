//! Keyboard, mouse and virtual-pad input handling.
//!
//! Raw input events never touch the pose directly. Event callbacks write into
//! an [`InputState`] buffer; once per frame the frame loop takes an
//! [`InputSnapshot`] and turns it into movement intents. This keeps every
//! frame's update deterministic regardless of when events arrive.
//!
//! Two digital sources are tracked independently (arrow keys and WASD), so
//! holding both moves twice per frame, matching how the keys behave when they
//! are polled separately.

use winit::keyboard;

use crate::config::MovementConfig;
use crate::game::collision::Intent;

/// Which physical key group produced a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Arrow keys.
    Primary,
    /// WASD.
    Supplementary,
}

/// Abstract directional keys, decoupled from physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move forward (W or Up Arrow).
    Forward,
    /// Move backward (S or Down Arrow).
    Backward,
    /// Turn left (A or Left Arrow).
    Left,
    /// Turn right (D or Right Arrow).
    Right,
}

/// Pressed state of the four directional keys of one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalKeys {
    fn set(&mut self, key: GameKey, pressed: bool) {
        match key {
            GameKey::Forward => self.forward = pressed,
            GameKey::Backward => self.backward = pressed,
            GameKey::Left => self.left = pressed,
            GameKey::Right => self.right = pressed,
        }
    }

    /// Forward wins over backward, left wins over right.
    fn intents(&self, translation: f32, rotation: f32, out: &mut Vec<(Intent, f32)>) {
        if self.forward {
            out.push((Intent::Forward, translation));
        } else if self.backward {
            out.push((Intent::Backward, translation));
        }
        if self.left {
            out.push((Intent::TurnLeft, rotation));
        } else if self.right {
            out.push((Intent::TurnRight, rotation));
        }
    }
}

/// Analog deflection of the virtual pad, each axis in `[-1, 1]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PadAxes {
    /// Positive is forward.
    pub forward: f32,
    /// Positive turns left.
    pub turn: f32,
}

impl PadAxes {
    fn intents(&self, config: &MovementConfig, out: &mut Vec<(Intent, f32)>) {
        let forward = self.forward.clamp(-1.0, 1.0);
        let turn = self.turn.clamp(-1.0, 1.0);
        if forward > 0.0 {
            out.push((Intent::Forward, config.pad_translation * forward));
        } else if forward < 0.0 {
            out.push((Intent::Backward, config.pad_translation * -forward));
        }
        if turn > 0.0 {
            out.push((Intent::TurnLeft, config.pad_rotation * turn));
        } else if turn < 0.0 {
            out.push((Intent::TurnRight, config.pad_rotation * -turn));
        }
    }
}

/// Input buffer written by event callbacks.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    primary: DirectionalKeys,
    supplementary: DirectionalKeys,
    pad: PadAxes,
    look_delta_x: f64,
}

impl InputState {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, source: InputSource, key: GameKey) {
        self.keys_mut(source).set(key, true);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, source: InputSource, key: GameKey) {
        self.keys_mut(source).set(key, false);
    }

    /// Accumulates horizontal mouse movement (pixels, positive is right).
    pub fn mouse_motion(&mut self, delta_x: f64) {
        self.look_delta_x += delta_x;
    }

    /// Sets the virtual pad deflection.
    pub fn set_pad(&mut self, pad: PadAxes) {
        self.pad = pad;
    }

    /// Releases everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Takes the per-frame snapshot and resets accumulated mouse movement.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            primary: self.primary,
            supplementary: self.supplementary,
            pad: self.pad,
            look_delta_x: self.look_delta_x,
        };
        self.look_delta_x = 0.0;
        snapshot
    }

    fn keys_mut(&mut self, source: InputSource) -> &mut DirectionalKeys {
        match source {
            InputSource::Primary => &mut self.primary,
            InputSource::Supplementary => &mut self.supplementary,
        }
    }
}

/// Input sampled once at the top of a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub primary: DirectionalKeys,
    pub supplementary: DirectionalKeys,
    pub pad: PadAxes,
    pub look_delta_x: f64,
}

impl InputSnapshot {
    /// Movement intents for this frame, in application order.
    ///
    /// Primary keys first, then supplementary keys, then the virtual pad, then
    /// mouse look.
    pub fn intents(&self, config: &MovementConfig) -> Vec<(Intent, f32)> {
        let mut out = Vec::new();
        self.primary
            .intents(config.key_translation, config.key_rotation, &mut out);
        self.supplementary
            .intents(config.key_translation, config.key_rotation, &mut out);
        self.pad.intents(config, &mut out);

        let look = self.look_delta_x as f32 * config.mouse_sensitivity;
        if look > 0.0 {
            out.push((Intent::TurnRight, look));
        } else if look < 0.0 {
            out.push((Intent::TurnLeft, -look));
        }
        out
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a source and [`GameKey`].
///
/// Arrow keys map to [`InputSource::Primary`], WASD to
/// [`InputSource::Supplementary`].
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<(InputSource, GameKey)> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::Forward,
            ArrowDown => GameKey::Backward,
            ArrowLeft => GameKey::Left,
            ArrowRight => GameKey::Right,
        })
        .map(|key| (InputSource::Primary, key)),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::Forward,
            "s" => GameKey::Backward,
            "a" => GameKey::Left,
            "d" => GameKey::Right,
        })
        .map(|key| (InputSource::Supplementary, key)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey, SmolStr};

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::ArrowUp)),
            Some((InputSource::Primary, GameKey::Forward))
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Character(SmolStr::new("A"))),
            Some((InputSource::Supplementary, GameKey::Left))
        );
        assert_eq!(winit_key_to_game_key(&Key::Character(SmolStr::new("q"))), None);
        assert_eq!(winit_key_to_game_key(&Key::Named(NamedKey::Escape)), None);
    }

    #[test]
    fn test_forward_wins_over_backward() {
        let config = MovementConfig::default();
        let mut input = InputState::new();
        input.press_key(InputSource::Primary, GameKey::Forward);
        input.press_key(InputSource::Primary, GameKey::Backward);
        input.press_key(InputSource::Primary, GameKey::Right);

        let intents = input.snapshot().intents(&config);
        assert_eq!(
            intents,
            vec![(Intent::Forward, 2.5), (Intent::TurnRight, 0.01)]
        );
    }

    #[test]
    fn test_sources_apply_independently() {
        let config = MovementConfig::default();
        let mut input = InputState::new();
        input.press_key(InputSource::Primary, GameKey::Forward);
        input.press_key(InputSource::Supplementary, GameKey::Forward);

        let intents = input.snapshot().intents(&config);
        assert_eq!(intents, vec![(Intent::Forward, 2.5), (Intent::Forward, 2.5)]);

        input.release_key(InputSource::Primary, GameKey::Forward);
        let intents = input.snapshot().intents(&config);
        assert_eq!(intents, vec![(Intent::Forward, 2.5)]);
    }

    #[test]
    fn test_pad_scales_by_deflection() {
        let config = MovementConfig::default();
        let mut input = InputState::new();
        input.set_pad(PadAxes {
            forward: -0.5,
            turn: 1.0,
        });

        let intents = input.snapshot().intents(&config);
        assert_eq!(
            intents,
            vec![(Intent::Backward, 2.5), (Intent::TurnLeft, 0.05)]
        );
    }

    #[test]
    fn test_mouse_delta_consumed_by_snapshot() {
        let config = MovementConfig::default();
        let mut input = InputState::new();
        input.mouse_motion(30.0);
        input.mouse_motion(20.0);

        let intents = input.snapshot().intents(&config);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].0, Intent::TurnRight);
        assert!((intents[0].1 - 0.05).abs() < 1e-6);

        assert!(input.snapshot().intents(&config).is_empty());
    }
}
