use std::fmt;

/// Contents of a single board cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Player = 1,
    Wall = 2,
    Box = 3,
    Goal = 4,
    BoxOnGoal = 5,
    PlayerOnGoal = 6,
}

impl Cell {
    /// All cell kinds in code order
    pub const ALL: [Cell; 7] = [
        Cell::Empty,
        Cell::Player,
        Cell::Wall,
        Cell::Box,
        Cell::Goal,
        Cell::BoxOnGoal,
        Cell::PlayerOnGoal,
    ];

    /// Parse a level-format symbol
    #[inline]
    pub const fn from_char(c: char) -> Option<Cell> {
        match c {
            ' ' => Some(Cell::Empty),
            '@' => Some(Cell::Player),
            '#' => Some(Cell::Wall),
            '$' => Some(Cell::Box),
            '.' => Some(Cell::Goal),
            '*' => Some(Cell::BoxOnGoal),
            '+' => Some(Cell::PlayerOnGoal),
            _ => None,
        }
    }

    /// Level-format symbol for this cell
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Player => '@',
            Cell::Wall => '#',
            Cell::Box => '$',
            Cell::Goal => '.',
            Cell::BoxOnGoal => '*',
            Cell::PlayerOnGoal => '+',
        }
    }

    /// Numeric code (0-6) used in observations
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Cell::code`]
    #[inline]
    pub const fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Player),
            2 => Some(Cell::Wall),
            3 => Some(Cell::Box),
            4 => Some(Cell::Goal),
            5 => Some(Cell::BoxOnGoal),
            6 => Some(Cell::PlayerOnGoal),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    #[inline]
    pub const fn has_box(self) -> bool {
        matches!(self, Cell::Box | Cell::BoxOnGoal)
    }

    #[inline]
    pub const fn has_player(self) -> bool {
        matches!(self, Cell::Player | Cell::PlayerOnGoal)
    }

    #[inline]
    pub const fn is_goal(self) -> bool {
        matches!(self, Cell::Goal | Cell::BoxOnGoal | Cell::PlayerOnGoal)
    }

    /// The cell once the player has stepped into it.
    /// A goal stays visible underneath the player.
    #[inline]
    pub const fn with_player(self) -> Cell {
        if self.is_goal() {
            Cell::PlayerOnGoal
        } else {
            Cell::Player
        }
    }

    /// The cell once a box has been pushed into it
    #[inline]
    pub const fn with_box(self) -> Cell {
        if self.is_goal() {
            Cell::BoxOnGoal
        } else {
            Cell::Box
        }
    }

    /// The cell once its occupant (player or box) has left
    #[inline]
    pub const fn vacated(self) -> Cell {
        match self {
            Cell::Wall => Cell::Wall,
            _ if self.is_goal() => Cell::Goal,
            _ => Cell::Empty,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
