//! Monte Carlo Tree Search for single-agent puzzles.
//!
//! This crate provides a generic MCTS implementation that can be used with
//! any puzzle implementing the `sokozero_core::Puzzle` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `Puzzle` implementation
//! - **PUCT Selection**: Uses the PUCT formula for action selection
//! - **Shared states**: Nodes are keyed by state, so transpositions merge
//!   and cycles are detected
//! - **Evaluator Abstraction**: Uniform priors, random rollouts, or an
//!   external estimator
//! - **Temperature Sampling**: Visit-count distributions at any temperature
//!
//! # Example
//!
//! ```
//! use sokozero_core::Puzzle;
//! use sokozero_mcts::{Mcts, MctsConfig, RolloutEvaluator};
//! use sokozero_sokoban::Sokoban;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let game = Sokoban::from_level("#####\n#@$.#\n#####").unwrap();
//! let state = game.initial_state();
//!
//! let config = MctsConfig::with_simulations(25);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let evaluator = RolloutEvaluator::new(rng.clone(), 20);
//! let mut mcts = Mcts::new(config, evaluator, rng);
//!
//! let result = mcts.search(&game, &state).unwrap();
//! println!("Best action: {}", result.best_action);
//! println!("Root value: {}", result.root_value);
//! ```

pub mod config;
pub mod evaluator;
mod node;
pub mod search;
#[cfg(test)]
mod test_puzzle;
mod tree;

pub use config::MctsConfig;
pub use evaluator::{Evaluation, Evaluator, RolloutEvaluator, UniformEvaluator};
pub use search::{greedy_action, sample_action, Mcts, SearchResult};
