//! Key mapping from raw key names to input events.
//!
//! Key names are whatever the host reports (`"ArrowLeft"`, `"z"`, `"Enter"`).
//! Matching is exact except for single letters, which ignore case.

use serde::{Deserialize, Serialize};

use crate::types::InputEvent;

/// Remappable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Binding {
    RotateLeft,
    RotateRight,
    Left,
    Right,
    Down,
    StartPause,
    Restart,
    Rewind,
    FastForward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyMap {
    pub restart: String,
    pub rewind: String,
    pub fast_forward: String,
    pub start_pause: String,
    pub rotate_left: String,
    pub rotate_right: String,
    pub left: String,
    pub down: String,
    pub right: String,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            restart: "r".to_string(),
            rewind: "v".to_string(),
            fast_forward: "b".to_string(),
            start_pause: "Enter".to_string(),
            rotate_left: "z".to_string(),
            rotate_right: "x".to_string(),
            left: "ArrowLeft".to_string(),
            down: "ArrowDown".to_string(),
            right: "ArrowRight".to_string(),
        }
    }
}

fn key_matches(bound: &str, key: &str) -> bool {
    if bound.chars().count() == 1 && key.chars().count() == 1 {
        return bound.eq_ignore_ascii_case(key);
    }
    bound == key
}

impl KeyMap {
    pub fn key_for(&self, binding: Binding) -> &str {
        match binding {
            Binding::RotateLeft => &self.rotate_left,
            Binding::RotateRight => &self.rotate_right,
            Binding::Left => &self.left,
            Binding::Right => &self.right,
            Binding::Down => &self.down,
            Binding::StartPause => &self.start_pause,
            Binding::Restart => &self.restart,
            Binding::Rewind => &self.rewind,
            Binding::FastForward => &self.fast_forward,
        }
    }

    /// Rebind one action.
    pub fn bind(&mut self, binding: Binding, key: impl Into<String>) {
        let key = key.into();
        let slot = match binding {
            Binding::RotateLeft => &mut self.rotate_left,
            Binding::RotateRight => &mut self.rotate_right,
            Binding::Left => &mut self.left,
            Binding::Right => &mut self.right,
            Binding::Down => &mut self.down,
            Binding::StartPause => &mut self.start_pause,
            Binding::Restart => &mut self.restart,
            Binding::Rewind => &mut self.rewind,
            Binding::FastForward => &mut self.fast_forward,
        };
        *slot = key;
    }

    /// Event for a key going down. Host key-repeat should be filtered by the caller.
    pub fn on_key_down(&self, key: &str) -> Option<InputEvent> {
        let table = [
            (Binding::Restart, InputEvent::Restart),
            (Binding::Rewind, InputEvent::Rewind),
            (Binding::FastForward, InputEvent::FastForward),
            (Binding::StartPause, InputEvent::TogglePause),
            (Binding::Left, InputEvent::PressLeft),
            (Binding::Right, InputEvent::PressRight),
            (Binding::Down, InputEvent::PressDown),
            (Binding::RotateLeft, InputEvent::RotateLeft),
            (Binding::RotateRight, InputEvent::RotateRight),
        ];
        table
            .into_iter()
            .find(|(binding, _)| key_matches(self.key_for(*binding), key))
            .map(|(_, event)| event)
    }

    /// Event for a key going up. Only the d-pad reports releases.
    pub fn on_key_up(&self, key: &str) -> Option<InputEvent> {
        if key_matches(&self.left, key) {
            Some(InputEvent::ReleaseLeft)
        } else if key_matches(&self.right, key) {
            Some(InputEvent::ReleaseRight)
        } else if key_matches(&self.down, key) {
            Some(InputEvent::ReleaseDown)
        } else {
            None
        }
    }
}
