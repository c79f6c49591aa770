use std::fmt;

/// A grid-relative move of the player.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in iteration order (up, right, down, left)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row and column offset of one step in this direction
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Direction with the given offset, if it is a unit step
    pub const fn from_delta(d_row: isize, d_col: isize) -> Option<Direction> {
        match (d_row, d_col) {
            (-1, 0) => Some(Direction::Up),
            (0, 1) => Some(Direction::Right),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            _ => None,
        }
    }

    /// LURD notation character (lowercase for walks)
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Right => 'r',
            Direction::Down => 'd',
            Direction::Left => 'l',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
