//! SokoZero Core - Puzzle abstractions and common types
//!
//! This crate provides the core `Puzzle` trait that defines the interface
//! a single-agent puzzle must implement to be searched by MCTS and used
//! for self-play data generation.
//!
//! # Types
//!
//! - [`Puzzle`] - Trait for puzzle implementations
//! - [`Policy`] - Probability distribution over actions (sums to 1.0)
//! - [`Value`] - Value estimate in [-1, 1]
//! - [`LegalMask`] - Legal-action mask carried alongside policy vectors
//! - [`Outcome`] - How a terminal state ended

mod error;
mod puzzle;
mod types;

pub use error::{Result, SokoZeroError};
pub use puzzle::Puzzle;
pub use types::{LegalMask, Outcome, Policy, Value};
