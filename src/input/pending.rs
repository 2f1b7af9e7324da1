use std::cell::Cell;
use std::rc::Rc;

use crate::game::{Direction, InputSource};

/// Single-slot mailbox between the event loop and the simulation
///
/// Clones share the slot: the event loop keeps one handle to [`set`] the
/// latest key press, the simulation owns another and takes it each tick.
/// A newer press replaces an unconsumed older one.
///
/// [`set`]: PendingDirection::set
#[derive(Debug, Clone, Default)]
pub struct PendingDirection {
    slot: Rc<Cell<Option<Direction>>>,
}

impl PendingDirection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, direction: Direction) {
        self.slot.set(Some(direction));
    }

    pub fn clear(&self) {
        self.slot.set(None);
    }

    pub fn peek(&self) -> Option<Direction> {
        self.slot.get()
    }
}

impl InputSource for PendingDirection {
    fn next_direction(&mut self) -> Option<Direction> {
        self.slot.take()
    }
}
