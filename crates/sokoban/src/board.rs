//! Sokoban board representation and move rules.

use std::fmt;
use std::str::FromStr;

use sokozero_core::{Result, SokoZeroError};

use crate::{Cell, Direction};

/// Where the player ends up after a move, and where the pushed box ends up.
#[derive(Clone, Copy, Debug)]
struct Step {
    target: usize,
    push_to: Option<usize>,
}

/// A Sokoban board.
///
/// Boards are immutable snapshots: [`Board::apply`] returns a new board, so a
/// search tree can re-derive any state from its root without aliasing.
///
/// Invariant: exactly one cell holds the player (`Player` or `PlayerOnGoal`).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    /// Cells in row-major order
    cells: Vec<Cell>,
    /// Cached index of the player cell
    player: usize,
}

impl Board {
    /// Parse a level in the standard text format.
    ///
    /// Dimensions are inferred from the number of rows and the longest row;
    /// shorter rows are padded with empty cells on the right.
    ///
    /// # Errors
    /// Returns `MalformedLevel` for empty input, unrecognized symbols, a blank
    /// row inside the level, or anything other than exactly one player.
    pub fn parse(text: &str) -> Result<Board> {
        let mut rows: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let leading = rows.iter().take_while(|row| row.is_empty()).count();
        rows.drain(..leading);

        if rows.is_empty() {
            return Err(SokoZeroError::MalformedLevel("level is empty".to_string()));
        }

        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);

        for (row, line) in rows.iter().enumerate() {
            if line.is_empty() {
                return Err(SokoZeroError::MalformedLevel(format!(
                    "blank row {} inside level",
                    row
                )));
            }

            let mut len = 0;
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    SokoZeroError::MalformedLevel(format!(
                        "unrecognized symbol {:?} at row {}, column {}",
                        c, row, col
                    ))
                })?;
                cells.push(cell);
                len += 1;
            }
            cells.extend(std::iter::repeat(Cell::Empty).take(width - len));
        }

        Self::from_cells(width, height, cells)
    }

    /// Build a board from row-major cells.
    ///
    /// # Errors
    /// Returns `MalformedLevel` if the cell count does not match the
    /// dimensions or the board does not hold exactly one player.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Board> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(SokoZeroError::MalformedLevel(format!(
                "{} cells do not fill a {}x{} grid",
                cells.len(),
                width,
                height
            )));
        }

        let players: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.has_player())
            .map(|(i, _)| i)
            .collect();

        match players.as_slice() {
            [player] => Ok(Board {
                width,
                height,
                player: *player,
                cells,
            }),
            [] => Err(SokoZeroError::MalformedLevel(
                "level has no player".to_string(),
            )),
            many => Err(SokoZeroError::MalformedLevel(format!(
                "level has {} players, expected exactly one",
                many.len()
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at (row, col), or None if out of bounds
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Player position as (row, col)
    pub fn player(&self) -> (usize, usize) {
        (self.player / self.width, self.player % self.width)
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Index of the cell `steps` cells away from `index` in `dir`, if in bounds.
    fn offset(&self, index: usize, dir: Direction, steps: isize) -> Option<usize> {
        let (d_row, d_col) = dir.delta();
        let row = (index / self.width) as isize + d_row * steps;
        let col = (index % self.width) as isize + d_col * steps;

        if row < 0 || col < 0 || row >= self.height as isize || col >= self.width as isize {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Resolve a move, returning None if it is illegal.
    ///
    /// The cell a box is pushed into is always two steps from the player in
    /// the move's direction.
    fn resolve(&self, dir: Direction) -> Option<Step> {
        let target = self.offset(self.player, dir, 1)?;
        let cell = self.cells[target];

        if cell.is_wall() {
            return None;
        }
        if !cell.has_box() {
            return Some(Step {
                target,
                push_to: None,
            });
        }

        let beyond = self.offset(self.player, dir, 2)?;
        let beyond_cell = self.cells[beyond];
        if beyond_cell.is_wall() || beyond_cell.has_box() {
            return None;
        }
        Some(Step {
            target,
            push_to: Some(beyond),
        })
    }

    /// Check if moving in `dir` is legal
    pub fn is_legal(&self, dir: Direction) -> bool {
        self.resolve(dir).is_some()
    }

    /// Check if moving in `dir` is a legal push
    pub fn is_push(&self, dir: Direction) -> bool {
        matches!(self.resolve(dir), Some(Step { push_to: Some(_), .. }))
    }

    /// All legal moves, in `Direction::ALL` order
    pub fn legal_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_legal(dir))
            .collect()
    }

    /// Apply a move, returning the resulting board.
    ///
    /// # Errors
    /// Returns `IllegalMove` if `dir` is not among [`Board::legal_moves`].
    pub fn apply(&self, dir: Direction) -> Result<Board> {
        let step = self.resolve(dir).ok_or_else(|| {
            let (row, col) = self.player();
            SokoZeroError::IllegalMove(format!(
                "cannot move {:?} from row {}, column {}",
                dir, row, col
            ))
        })?;

        let mut next = self.clone();
        if let Some(beyond) = step.push_to {
            next.cells[beyond] = next.cells[beyond].with_box();
        }
        next.cells[step.target] = next.cells[step.target].vacated().with_player();
        next.cells[self.player] = next.cells[self.player].vacated();
        next.player = step.target;

        Ok(next)
    }

    /// True iff no box is left off a goal
    pub fn is_solved(&self) -> bool {
        !self.cells.contains(&Cell::Box)
    }

    /// Render in the level text format (inverse of [`Board::parse`])
    pub fn render(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for (row, line) in self.cells.chunks(self.width).enumerate() {
            if row > 0 {
                text.push('\n');
            }
            text.extend(line.iter().map(|cell| cell.to_char()));
        }
        text
    }
}

impl FromStr for Board {
    type Err = SokoZeroError;

    fn from_str(s: &str) -> Result<Self> {
        Board::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
