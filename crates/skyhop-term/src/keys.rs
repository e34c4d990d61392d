use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use skyhop_core::input::{InputState, Key};

/// Frames a key stays held after its last press or repeat when the terminal
/// cannot report releases.
pub const DEFAULT_HOLD_FRAMES: u32 = 12;

/// What a terminal key event means to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(Key),
    Quit,
    Ignored,
}

pub fn map_key(event: &KeyEvent) -> KeyAction {
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match event.code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => KeyAction::Game(Key::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => KeyAction::Game(Key::Right),
        KeyCode::Up | KeyCode::Char('w' | 'W' | ' ') => KeyAction::Game(Key::Jump),
        KeyCode::Enter => KeyAction::Game(Key::Confirm),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignored,
    }
}

/// Feeds terminal key events into an [`InputState`].
///
/// With release reporting the events pass straight through. Without it every
/// press or repeat re-arms a countdown and the key is released once the
/// countdown runs out.
#[derive(Debug)]
pub struct KeyTracker {
    hold_frames: u32,
    reports_release: bool,
    countdowns: HashMap<Key, u32>,
}

impl KeyTracker {
    pub fn new(reports_release: bool, hold_frames: u32) -> Self {
        Self {
            hold_frames: hold_frames.max(1),
            reports_release,
            countdowns: HashMap::new(),
        }
    }

    /// Apply one event. Returns `true` when the player asked to quit.
    pub fn handle(&mut self, event: &KeyEvent, input: &mut InputState) -> bool {
        let key = match map_key(event) {
            KeyAction::Game(key) => key,
            KeyAction::Quit => return event.kind != KeyEventKind::Release,
            KeyAction::Ignored => return false,
        };

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                input.on_key_down(key);
                if !self.reports_release {
                    self.countdowns.insert(key, self.hold_frames);
                }
            },
            KeyEventKind::Release => {
                self.countdowns.remove(&key);
                input.on_key_up(key);
            },
        }
        false
    }

    /// Age emulated holds by one frame, releasing the ones that expired.
    pub fn end_frame(&mut self, input: &mut InputState) {
        self.countdowns.retain(|key, frames| {
            *frames -= 1;
            if *frames == 0 {
                input.on_key_up(*key);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        event(code, KeyEventKind::Press)
    }

    #[test]
    fn key_bindings() {
        assert_eq!(map_key(&press(KeyCode::Left)), KeyAction::Game(Key::Left));
        assert_eq!(map_key(&press(KeyCode::Char('a'))), KeyAction::Game(Key::Left));
        assert_eq!(map_key(&press(KeyCode::Char('D'))), KeyAction::Game(Key::Right));
        assert_eq!(map_key(&press(KeyCode::Up)), KeyAction::Game(Key::Jump));
        assert_eq!(map_key(&press(KeyCode::Char(' '))), KeyAction::Game(Key::Jump));
        assert_eq!(map_key(&press(KeyCode::Enter)), KeyAction::Game(Key::Confirm));
        assert_eq!(map_key(&press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(map_key(&press(KeyCode::Char('x'))), KeyAction::Ignored);

        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char('c'))
        };
        assert_eq!(map_key(&ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn quit_request() {
        let mut tracker = KeyTracker::new(false, 3);
        let mut input = InputState::new();
        assert!(tracker.handle(&press(KeyCode::Char('q')), &mut input));
        assert!(!tracker.handle(&press(KeyCode::Left), &mut input));
    }

    #[test]
    fn emulated_hold_expires() {
        let mut tracker = KeyTracker::new(false, 3);
        let mut input = InputState::new();
        tracker.handle(&press(KeyCode::Left), &mut input);

        for _ in 0..2 {
            assert!(input.frame_input().left);
            tracker.end_frame(&mut input);
        }
        assert!(input.frame_input().left);
        tracker.end_frame(&mut input);
        assert!(!input.frame_input().left);
    }

    #[test]
    fn repeat_extends_hold_without_new_press() {
        let mut tracker = KeyTracker::new(false, 2);
        let mut input = InputState::new();
        tracker.handle(&press(KeyCode::Up), &mut input);
        assert!(input.frame_input().jump);
        input.end_frame();
        tracker.end_frame(&mut input);

        tracker.handle(&event(KeyCode::Up, KeyEventKind::Repeat), &mut input);
        assert!(!input.frame_input().jump, "Auto-repeat is not a new jump");
        input.end_frame();
        tracker.end_frame(&mut input);
        assert!(input.is_key_down(Key::Jump));
    }

    #[test]
    fn release_reporting_skips_countdown() {
        let mut tracker = KeyTracker::new(true, 1);
        let mut input = InputState::new();
        tracker.handle(&press(KeyCode::Right), &mut input);
        for _ in 0..10 {
            tracker.end_frame(&mut input);
        }
        assert!(input.frame_input().right);

        tracker.handle(&event(KeyCode::Right, KeyEventKind::Release), &mut input);
        assert!(!input.frame_input().right);
    }

    #[test]
    fn quit_ignored_on_release() {
        let mut tracker = KeyTracker::new(true, 1);
        let mut input = InputState::new();
        assert!(!tracker.handle(&event(KeyCode::Esc, KeyEventKind::Release), &mut input));
    }
}
