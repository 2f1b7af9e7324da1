use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key press means to the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = Self::steering(key.code) {
            return KeyAction::Steer(direction);
        }

        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => KeyAction::Quit,
                'r' => KeyAction::Restart,
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }

    /// Arrow keys and WASD, either case
    fn steering(code: KeyCode) -> Option<Direction> {
        let direction = match code {
            KeyCode::Up => Direction::Up,
            KeyCode::Down => Direction::Down,
            KeyCode::Left => Direction::Left,
            KeyCode::Right => Direction::Right,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Direction::Up,
                's' => Direction::Down,
                'a' => Direction::Left,
                'd' => Direction::Right,
                _ => return None,
            },
            _ => return None,
        };
        Some(direction)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
