//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Jumping reads this, so holding Space re-jumps on the
//!   first grounded frame.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened, cleared by `end_frame()` once the frame's
//!   update has consumed them. Used for toggles like the debug window.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    F3,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Horizontal intent in [-1, 1] from the arrow keys.
    pub fn axis_x(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Key::Left) {
            axis -= 1.0;
        }
        if self.is_held(Key::Right) {
            axis += 1.0;
        }
        axis
    }

    /// Drop all keys, e.g. when the window loses focus and release events
    /// will never arrive.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.held.drain());
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        assert!(!input.is_held(Key::Space));
        assert!(input.is_just_released(Key::Space));
    }

    #[test]
    fn test_key_repeat_does_not_retrigger_after_end_frame() {
        let mut input = InputState::new();
        input.key_down(Key::F3);
        input.end_frame();
        // OS key repeat delivers another press while the key is still held.
        input.key_down(Key::F3);
        assert!(input.is_held(Key::F3));
        assert!(!input.is_just_pressed(Key::F3));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Escape);
        assert!(!input.is_just_released(Key::Escape));
        assert!(!input.is_held(Key::Escape));
    }

    #[test]
    fn test_end_frame_keeps_held_keys() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_down(Key::Left);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Space));
        assert!(input.is_held(Key::Space));
        assert!(input.is_held(Key::Left));
    }

    #[test]
    fn test_axis_x_combines_arrows() {
        let mut input = InputState::new();
        assert_eq!(input.axis_x(), 0.0);
        input.key_down(Key::Left);
        assert_eq!(input.axis_x(), -1.0);
        input.key_down(Key::Right);
        assert_eq!(input.axis_x(), 0.0);
        input.key_up(Key::Left);
        assert_eq!(input.axis_x(), 1.0);
    }

    #[test]
    fn test_release_all_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_down(Key::Right);
        input.release_all();
        assert!(!input.is_held(Key::Space));
        assert!(!input.is_held(Key::Right));
        assert!(input.is_just_released(Key::Space));
    }
}
