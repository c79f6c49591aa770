//! Flat action indices for policy vectors.
//!
//! A step is identified by the cell the player moves into, so index
//! `row * width + col` names a destination and `width * height` is the pass
//! action. Because indices live on the board grid, the policy vector can be
//! rotated and flipped together with the board.

use std::fmt;

use crate::{Board, Direction};

/// A puzzle action.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// Move the player into the adjacent cell at (row, col)
    Step { row: usize, col: usize },
    /// Stay put; only legal when no move is
    Pass,
}

impl Action {
    /// The action that moves the player of `board` in `dir`.
    ///
    /// Returns None if the destination is off the grid.
    pub fn from_move(board: &Board, dir: Direction) -> Option<Action> {
        let (row, col) = board.player();
        let (d_row, d_col) = dir.delta();
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;

        if row >= board.height() || col >= board.width() {
            return None;
        }
        Some(Action::Step { row, col })
    }

    /// The direction this action moves the player of `board`.
    ///
    /// Returns None for `Pass` and for destinations not adjacent to the player.
    pub fn to_move(self, board: &Board) -> Option<Direction> {
        match self {
            Action::Pass => None,
            Action::Step { row, col } => {
                let (p_row, p_col) = board.player();
                Direction::from_delta(
                    row as isize - p_row as isize,
                    col as isize - p_col as isize,
                )
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Step { row, col } => write!(f, "({}, {})", row, col),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// Bijection between actions and indices `0..=width * height`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionSpace {
    width: usize,
    height: usize,
}

impl ActionSpace {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn for_board(board: &Board) -> Self {
        Self::new(board.width(), board.height())
    }

    /// Number of action indices, including pass
    pub fn size(&self) -> usize {
        self.width * self.height + 1
    }

    /// Index of the pass action
    pub fn pass_index(&self) -> usize {
        self.width * self.height
    }

    /// Flat index of an action
    pub fn index(&self, action: Action) -> usize {
        match action {
            Action::Step { row, col } => row * self.width + col,
            Action::Pass => self.pass_index(),
        }
    }

    /// Action for a flat index, or None if out of range
    pub fn action(&self, index: usize) -> Option<Action> {
        let cells = self.width * self.height;
        if index < cells {
            Some(Action::Step {
                row: index / self.width,
                col: index % self.width,
            })
        } else if index == cells {
            Some(Action::Pass)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bijection() {
        let space = ActionSpace::new(5, 3);
        assert_eq!(space.size(), 16);

        for index in 0..space.size() {
            let action = space.action(index).unwrap();
            assert_eq!(space.index(action), index);
        }
        assert_eq!(space.action(15), Some(Action::Pass));
        assert_eq!(space.action(16), None);
        assert_eq!(space.action(7), Some(Action::Step { row: 1, col: 2 }));
    }

    #[test]
    fn test_move_roundtrip() {
        let board = Board::parse("#####\n#   #\n# @ #\n#   #\n#####").unwrap();
        for dir in Direction::ALL {
            let action = Action::from_move(&board, dir).unwrap();
            assert_eq!(action.to_move(&board), Some(dir));
        }
        assert_eq!(
            Action::from_move(&board, Direction::Up),
            Some(Action::Step { row: 1, col: 2 })
        );
    }

    #[test]
    fn test_off_grid_and_non_adjacent() {
        let board = Board::parse("@ \n #").unwrap();
        assert_eq!(Action::from_move(&board, Direction::Up), None);
        assert_eq!(Action::from_move(&board, Direction::Left), None);

        assert_eq!(Action::Step { row: 1, col: 1 }.to_move(&board), None);
        assert_eq!(Action::Step { row: 0, col: 0 }.to_move(&board), None);
        assert_eq!(Action::Pass.to_move(&board), None);
    }
}
