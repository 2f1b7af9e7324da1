//! Seams between the simulation core and its collaborators

use anyhow::Result;

use super::action::Direction;
use super::mode::ModeKind;
use super::state::{Board, Body, Cell};

/// Supplies at most one pending heading per tick
pub trait InputSource {
    /// Take the pending heading, if any. `None` means "keep going".
    fn next_direction(&mut self) -> Option<Direction>;
}

/// Input source that never has anything to say (autonomous mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn next_direction(&mut self) -> Option<Direction> {
        None
    }
}

/// Read-only snapshot handed to a [`Renderer`]
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub board: Board,
    pub body: &'a Body,
    pub food: Cell,
    pub score: u32,
    pub terminated: bool,
    pub kind: ModeKind,
}

/// Draws a frame. Errors are reported, never fed back into the game.
pub trait Renderer {
    fn render(&mut self, view: &BoardView<'_>) -> Result<()>;
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &BoardView<'_>) -> Result<()> {
        Ok(())
    }
}

/// The slice of the simulation a control mode may touch when resolving food
pub trait FoodSource {
    /// Current food cell
    fn food(&self) -> Cell;

    /// Put new food somewhere off the body
    fn replenish(&mut self, body: &Body);
}
