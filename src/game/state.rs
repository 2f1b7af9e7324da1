use std::collections::VecDeque;

use super::action::{Action, Direction};
use super::config::GameConfig;

/// A block-aligned position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one block away in `direction`
    pub fn stepped(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * block_size,
            y: self.y + dy * block_size,
        }
    }
}

/// Board geometry, fixed for the lifetime of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

impl Board {
    pub fn new(width: i32, height: i32, block_size: i32) -> Self {
        Self {
            width,
            height,
            block_size,
        }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Total number of cells on the board
    pub fn capacity(&self) -> usize {
        (self.columns() * self.rows()).max(0) as usize
    }

    /// Inclusive bounds `[0, width - block] x [0, height - block]`
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x <= self.width - self.block_size
            && cell.y >= 0
            && cell.y <= self.height - self.block_size
    }

    /// The cell at grid column/row
    pub fn cell_at(&self, column: i32, row: i32) -> Cell {
        Cell::new(column * self.block_size, row * self.block_size)
    }

    /// Grid column/row of a cell
    pub fn grid_position(&self, cell: Cell) -> (i32, i32) {
        (cell.x / self.block_size, cell.y / self.block_size)
    }

    /// Block-aligned centre of the board
    pub fn center(&self) -> Cell {
        self.cell_at(self.columns() / 2, self.rows() / 2)
    }

    /// Iterate over every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns()).map(move |col| self.cell_at(col, row)))
    }
}

impl From<&GameConfig> for Board {
    fn from(config: &GameConfig) -> Self {
        Self::new(config.width, config.height, config.block_size)
    }
}

/// The snake
///
/// `cells` is head-first. Movement computes a new head without touching
/// `cells`; the driver inserts it with [`Body::insert_head`] and later
/// drops the tail with [`Body::pop_tail`] unless food was eaten.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    cells: VecDeque<Cell>,
    head: Cell,
    heading: Direction,
    block_size: i32,
}

impl Body {
    /// A fresh snake heading right from the board centre, trailing to the left
    pub fn new(board: &Board, length: usize) -> Self {
        Self::laid_out(board.center(), Direction::Right, length, board.block_size)
    }

    /// A straight snake of `length` cells with its head at `head`
    pub fn laid_out(head: Cell, heading: Direction, length: usize, block_size: i32) -> Self {
        assert!(length > 0, "a snake needs at least one cell");

        let behind = heading.turned(Action::TurnRight).turned(Action::TurnRight);
        let mut cells = VecDeque::with_capacity(length);
        let mut cell = head;
        for _ in 0..length {
            cells.push_back(cell);
            cell = cell.stepped(behind, block_size);
        }

        Self {
            cells,
            head,
            heading,
            block_size,
        }
    }

    /// Build a snake from explicit head-first cells
    pub fn from_cells(cells: Vec<Cell>, heading: Direction, block_size: i32) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one cell");
        let head = cells[0];
        Self {
            cells: cells.into(),
            head,
            heading,
            block_size,
        }
    }

    pub fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    /// The most recently computed head. Equals `cells()[0]` once inserted.
    pub fn head(&self) -> Cell {
        self.head
    }

    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn set_heading(&mut self, heading: Direction) {
        self.heading = heading;
    }

    pub fn block_size(&self) -> i32 {
        self.block_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Step the head one block along the current heading
    pub fn advance(&mut self) -> Cell {
        self.head = self.head.stepped(self.heading, self.block_size);
        self.head
    }

    /// Re-derive the heading from a relative action, then step
    pub fn advance_with(&mut self, action: Action) -> Cell {
        self.heading = self.heading.turned(action);
        self.advance()
    }

    /// Make the computed head part of the body
    pub fn insert_head(&mut self) {
        self.cells.push_front(self.head);
    }

    /// Drop the oldest segment. The last cell is never removed.
    pub fn pop_tail(&mut self) {
        if self.cells.len() > 1 {
            self.cells.pop_back();
        }
    }

    /// True if any segment, head included, sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// True if `cell` hits a segment behind the head
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.cells.iter().skip(1).any(|&segment| segment == cell)
    }
}
