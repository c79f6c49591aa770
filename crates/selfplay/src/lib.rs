//! Self-play data generation and evaluation for SokoZero.
//!
//! - [`episode`] - one MCTS self-play episode with symmetry-expanded examples
//! - [`history`] - bounded example history with MessagePack checkpoints
//! - [`coach`] - parallel iterations, arena evaluation and gating
//! - [`arena`] - solve-rate evaluation of a fixed policy
//! - [`heuristic`] - greedy baseline player

pub mod arena;
pub mod coach;
pub mod config;
pub mod episode;
pub mod heuristic;
pub mod history;

pub use arena::{mcts_policy, Arena, ArenaOutcome, ArenaResult};
pub use coach::{gate, Coach, GateDecision, IterationSummary};
pub use config::SelfPlayConfig;
pub use episode::{run_episode, Episode, EpisodeOutcome, TrainingExample};
pub use heuristic::HeuristicPlayer;
pub use history::TrainingHistory;
