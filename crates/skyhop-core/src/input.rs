use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical keys the core understands. Adapters map their own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Confirm,
    Jump,
}

/// Input snapshot for a single tick.
///
/// `left`/`right` are held state; `confirm`/`jump` are press events that are
/// visible for exactly one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub jump: bool,
}

impl FrameInput {
    /// Horizontal direction: -1 (left), 0, +1 (right). Both held cancels out.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Default::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }
}

/// Keyboard state, updated from adapter key events and sampled once per frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_down: HashSet<Key>,
    /// Keys pressed this frame (cleared each frame).
    keys_just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down event. Repeats of an already-held key are not new presses.
    pub fn on_key_down(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Register a key release.
    pub fn on_key_up(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    /// Check if a key is currently held.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Build the per-tick snapshot the game consumes.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.is_key_down(Key::Left),
            right: self.is_key_down(Key::Right),
            confirm: self.is_key_just_pressed(Key::Confirm),
            jump: self.is_key_just_pressed(Key::Jump),
        }
    }

    /// Called at the end of each frame to clear per-frame press state.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
    }
}
