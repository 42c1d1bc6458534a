//! Keyboard queries consumed by the scene
use std::collections::{HashMap, HashSet};

/// Keys the scene reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, stored lowercase
    Char(char),
    Tab,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Printable key, case-folded so `'A'` and `'a'` are the same key
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }
}

/// Input-query interface.
///
/// `is_key_pressed` is edge-triggered (true on the first frame of a press),
/// `is_key_down` is level-triggered (true every frame the key is held).
pub trait Input {
    fn is_key_pressed(&self, key: Key) -> bool;
    fn is_key_down(&self, key: Key) -> bool;
}

/// Frame-based keyboard state with edge detection.
///
/// Feed the keys reported during a frame with [`KeyboardState::press`],
/// query, then call [`KeyboardState::end_frame`].
///
/// Sources with release events use [`KeyboardState::new`]: a key stays down
/// until [`KeyboardState::release`]. Sources that only report presses and
/// auto-repeats use [`KeyboardState::with_release_timeout`]: a key counts as
/// physically held until it goes unreported for that many frames, so repeats
/// arriving with gaps never produce a second edge.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    current: HashSet<Key>,
    previous: HashSet<Key>,
    /// Released this frame, dropped from `current` at `end_frame`
    released: HashSet<Key>,
    release_after: Option<u32>,
    /// Frames since each recently reported key was last seen
    idle: HashMap<Key, u32>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release_timeout(frames: u32) -> Self {
        Self {
            release_after: Some(frames.max(1)),
            ..Self::default()
        }
    }

    /// Mark a key as held this frame
    pub fn press(&mut self, key: Key) {
        self.current.insert(key);
        self.released.remove(&key);
    }

    /// Mark a key as released. It stays down until the frame ends, so a tap
    /// shorter than a frame still registers.
    pub fn release(&mut self, key: Key) {
        self.released.insert(key);
        self.idle.remove(&key);
    }

    /// Roll the current frame into the previous one
    pub fn end_frame(&mut self) {
        for key in self.released.drain() {
            self.current.remove(&key);
        }
        match self.release_after {
            None => self.previous = self.current.clone(),
            Some(limit) => {
                for key in self.current.drain() {
                    self.idle.insert(key, 0);
                }
                self.idle.retain(|_, frames| {
                    *frames += 1;
                    *frames <= limit
                });
                self.previous = self.idle.keys().copied().collect();
            }
        }
    }
}

impl Input for KeyboardState {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.current.contains(&key)
    }
}

/// Input that never reports a key
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl Input for NoInput {
    fn is_key_pressed(&self, _key: Key) -> bool {
        false
    }

    fn is_key_down(&self, _key: Key) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_is_edge_triggered() {
        let mut keys = KeyboardState::new();
        keys.press(Key::char('1'));
        assert!(keys.is_key_pressed(Key::char('1')));
        keys.end_frame();

        // Still held: down but no new press
        assert!(keys.is_key_down(Key::char('1')));
        assert!(!keys.is_key_pressed(Key::char('1')));

        keys.release(Key::char('1'));
        keys.end_frame();
        keys.press(Key::char('1'));
        assert!(keys.is_key_pressed(Key::char('1')));
    }

    #[test]
    fn test_gapped_repeats_are_one_press() {
        let mut keys = KeyboardState::with_release_timeout(4);
        let mut edges = 0;
        for frame in 0..6 {
            if frame % 2 == 0 {
                keys.press(Key::char('4'));
            }
            if keys.is_key_pressed(Key::char('4')) {
                edges += 1;
            }
            keys.end_frame();
        }
        assert_eq!(edges, 1);
    }

    #[test]
    fn test_timeout_rearms_after_silence() {
        let mut keys = KeyboardState::with_release_timeout(2);
        keys.press(Key::Up);
        assert!(keys.is_key_pressed(Key::Up));
        keys.end_frame();

        // Held only on frames that report it
        assert!(!keys.is_key_down(Key::Up));
        keys.end_frame();
        keys.end_frame();

        keys.press(Key::Up);
        assert!(keys.is_key_down(Key::Up));
        assert!(keys.is_key_pressed(Key::Up));
    }

    #[test]
    fn test_release_rearms_immediately() {
        let mut keys = KeyboardState::with_release_timeout(10);
        keys.press(Key::Tab);
        keys.end_frame();
        keys.release(Key::Tab);
        keys.end_frame();
        keys.press(Key::Tab);
        assert!(keys.is_key_pressed(Key::Tab));
    }

    #[test]
    fn test_tap_within_one_frame_registers() {
        let mut keys = KeyboardState::new();
        keys.press(Key::char('v'));
        keys.release(Key::char('v'));
        assert!(keys.is_key_pressed(Key::char('v')));
        keys.end_frame();
        assert!(!keys.is_key_down(Key::char('v')));
    }

    #[test]
    fn test_char_keys_fold_case() {
        assert_eq!(Key::char('I'), Key::char('i'));
    }

    #[test]
    fn test_no_input() {
        assert!(!NoInput.is_key_pressed(Key::Tab));
        assert!(!NoInput.is_key_down(Key::Tab));
    }
}
