//! Keyboard input for human play

pub mod handler;
pub mod pending;

pub use handler::{InputHandler, KeyAction};
pub use pending::PendingDirection;
