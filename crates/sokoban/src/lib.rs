//! Sokoban rules for SokoZero.
//!
//! - [`Board`] - grid of [`Cell`]s with a single player, parsed from the
//!   standard level format (`#` wall, `@` player, `$` box, `.` goal,
//!   `*` box on goal, `+` player on goal)
//! - [`Action`] / [`ActionSpace`] - destination-cell action encoding
//! - [`Sokoban`] - the [`Puzzle`](sokozero_core::Puzzle) implementation
//! - [`Symmetry`] - rotations and mirrors for training augmentation
//! - [`score`] - heuristic for the greedy baseline player

mod action;
mod board;
mod cell;
mod direction;
mod game_impl;
pub mod observation;
pub mod score;
pub mod symmetry;

pub use action::{Action, ActionSpace};
pub use board::Board;
pub use cell::Cell;
pub use direction::Direction;
pub use game_impl::Sokoban;
pub use symmetry::Symmetry;
