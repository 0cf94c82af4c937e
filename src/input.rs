//! Keyboard input
//!
//! Converts browser key names into held movement keys. Letter and arrow
//! bindings are tracked separately so releasing one does not cancel the other.

use crate::sim::MoveKeys;

/// Direction a key steers toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

/// Physical binding family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Letter,
    Arrow,
}

/// Map a `KeyboardEvent.key` value to a movement binding
fn binding(key: &str) -> Option<(Direction, Family)> {
    match key {
        "w" | "W" => Some((Direction::Forward, Family::Letter)),
        "s" | "S" => Some((Direction::Back, Family::Letter)),
        "a" | "A" => Some((Direction::Left, Family::Letter)),
        "d" | "D" => Some((Direction::Right, Family::Letter)),
        "ArrowUp" => Some((Direction::Forward, Family::Arrow)),
        "ArrowDown" => Some((Direction::Back, Family::Arrow)),
        "ArrowLeft" => Some((Direction::Left, Family::Arrow)),
        "ArrowRight" => Some((Direction::Right, Family::Arrow)),
        _ => None,
    }
}

/// Tracks which movement keys are currently held
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    /// Indexed by direction, then family
    held: [[bool; 2]; 4],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release. Returns true if the key is a movement key.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        match binding(key) {
            Some((dir, family)) => {
                self.held[dir as usize][family as usize] = pressed;
                true
            }
            None => false,
        }
    }

    fn is_held(&self, dir: Direction) -> bool {
        self.held[dir as usize].iter().any(|&h| h)
    }

    /// Snapshot for the next simulation step
    pub fn move_keys(&self) -> MoveKeys {
        MoveKeys {
            forward: self.is_held(Direction::Forward),
            back: self.is_held(Direction::Back),
            left: self.is_held(Direction::Left),
            right: self.is_held(Direction::Right),
        }
    }

    /// Release everything (e.g., on focus loss)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
