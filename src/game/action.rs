use std::fmt;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Headings in clockwise order, used to resolve relative turns
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Resolve a relative action against this heading
    pub fn turned(&self, action: Action) -> Direction {
        let index = self.clockwise_index();
        let next = match action {
            Action::Straight => index,
            Action::TurnRight => (index + 1) % 4,
            Action::TurnLeft => (index + 3) % 4,
        };
        Self::CLOCKWISE[next]
    }
}

/// Relative action taken by an autonomous agent
///
/// Wire form is a one-hot triple `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Decode a one-hot triple.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one entry is 1 and the rest are 0. A malformed
    /// triple means the policy producing it is broken.
    pub fn from_one_hot(triple: [u8; 3]) -> Self {
        match Self::try_from(triple) {
            Ok(action) => action,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn to_one_hot(self) -> [u8; 3] {
        match self {
            Action::Straight => [1, 0, 0],
            Action::TurnRight => [0, 1, 0],
            Action::TurnLeft => [0, 0, 1],
        }
    }

    /// Position of this action in the `[straight, right, left]` triple
    pub fn index(self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }
}

/// A triple that is not one-hot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionError {
    pub triple: [u8; 3],
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "action must be one-hot [straight, right, left], got {:?}",
            self.triple
        )
    }
}

impl std::error::Error for ActionError {}

impl TryFrom<[u8; 3]> for Action {
    type Error = ActionError;

    fn try_from(triple: [u8; 3]) -> Result<Self, Self::Error> {
        match triple {
            [1, 0, 0] => Ok(Action::Straight),
            [0, 1, 0] => Ok(Action::TurnRight),
            [0, 0, 1] => Ok(Action::TurnLeft),
            _ => Err(ActionError { triple }),
        }
    }
}
