//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.
//! Defaults follow the reference self-play settings (25 simulations, `c_puct` 1).

use sokozero_core::Outcome;

/// MCTS configuration parameters.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Number of simulations per search.
    pub num_simulations: usize,

    /// PUCT exploration weight.
    /// UCB(a) = Q(a) + c_puct * P(a) * sqrt(sum N) / (1 + N(a))
    pub c_puct: f32,

    /// Dirichlet noise alpha (for root exploration).
    /// Higher values = more uniform noise, lower = more concentrated.
    pub dirichlet_alpha: f32,

    /// Fraction of prior replaced with Dirichlet noise at root.
    /// 0 = no exploration noise, 1 = pure noise.
    pub exploration_fraction: f32,

    /// Value backed up from a solved state.
    pub solved_value: f32,

    /// Value backed up from a deadlocked state or a cycle.
    pub unsolved_value: f32,

    /// Keep the tree between searches instead of rebuilding it per decision.
    /// Callers reusing the tree must call `Mcts::reset` between episodes.
    pub reuse_tree: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 25,
            c_puct: 1.0,
            dirichlet_alpha: 0.3,
            exploration_fraction: 0.0,
            solved_value: 1.0,
            unsolved_value: 0.0,
            reuse_tree: false,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations.
    pub fn with_simulations(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            ..Default::default()
        }
    }

    /// Create a config for evaluation: no root noise, fresh tree per decision.
    pub fn for_evaluation(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            exploration_fraction: 0.0,
            reuse_tree: false,
            ..Default::default()
        }
    }

    /// Value backed up from a terminal state.
    pub fn terminal_value(&self, outcome: Outcome) -> f32 {
        match outcome {
            Outcome::Solved => self.solved_value,
            Outcome::Deadlocked => self.unsolved_value,
        }
    }
}
