//! Logical input state
//!
//! Key and touch handlers set actions held or released; the session reads a
//! [`TickInput`] from here once per frame.

use crate::sim::TickInput;

/// Logical actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
}

impl Action {
    /// Map a DOM `KeyboardEvent.key` value to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Action::MoveRight),
            " " | "Spacebar" => Some(Action::Fire),
            "r" | "R" => Some(Action::Restart),
            _ => None,
        }
    }
}

/// Which actions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    move_left: bool,
    move_right: bool,
    fire: bool,
    restart: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveLeft => self.move_left = held,
            Action::MoveRight => self.move_right = held,
            Action::Fire => self.fire = held,
            Action::Restart => self.restart = held,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::Fire => self.fire,
            Action::Restart => self.restart,
        }
    }

    /// Drop every held action (window blur, tab hidden)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            move_left: self.move_left,
            move_right: self.move_right,
            fire: self.fire,
            restart: self.restart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(Action::from_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(Action::from_key("D"), Some(Action::MoveRight));
        assert_eq!(Action::from_key(" "), Some(Action::Fire));
        assert_eq!(Action::from_key("r"), Some(Action::Restart));
        assert_eq!(Action::from_key("Escape"), None);
    }

    #[test]
    fn press_and_release_track_held_state() {
        let mut input = InputState::new();
        input.set(Action::MoveLeft, true);
        input.set(Action::Fire, true);
        assert!(input.is_held(Action::MoveLeft));

        let tick = input.tick_input();
        assert!(tick.move_left && tick.fire);
        assert!(!tick.move_right && !tick.restart);

        input.set(Action::MoveLeft, false);
        assert!(!input.is_held(Action::MoveLeft));
        assert!(input.is_held(Action::Fire));
    }

    #[test]
    fn release_all_clears_everything() {
        let mut input = InputState::new();
        input.set(Action::MoveRight, true);
        input.set(Action::Fire, true);
        input.release_all();
        assert_eq!(input.tick_input(), TickInput::default());
    }
}
