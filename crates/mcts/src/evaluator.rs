//! Evaluation abstraction for MCTS.
//!
//! The `Evaluator` trait is the seam to the external policy/value estimator:
//! - `UniformEvaluator` returns uniform priors and a fixed value
//! - `RolloutEvaluator` uses uniform priors and random playouts
//! - a trained network plugs in by implementing the trait

use std::cell::RefCell;

use rand::Rng;
use sokozero_core::{Puzzle, Result, Value};

/// Evaluation result: prior policy + value estimate.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Prior probability for each action index.
    /// Length must equal `game.num_actions()`.
    pub policy: Vec<f32>,

    /// Value estimate for the position, in [-1, 1].
    pub value: f32,
}

/// Trait for evaluating puzzle states.
pub trait Evaluator<G: Puzzle> {
    /// Evaluate a state, returning prior policy and value estimate.
    ///
    /// The policy covers the full action space; mass on illegal actions is
    /// masked away by the search. An error aborts the search step that
    /// requested the evaluation.
    fn evaluate(&self, game: &G, state: &G::State) -> Result<Evaluation>;
}

impl<G: Puzzle, E: Evaluator<G> + ?Sized> Evaluator<G> for &E {
    fn evaluate(&self, game: &G, state: &G::State) -> Result<Evaluation> {
        (**self).evaluate(game, state)
    }
}

/// Evaluator with uniform priors over legal actions and a constant value.
#[derive(Clone, Debug, Default)]
pub struct UniformEvaluator {
    value: f32,
}

impl UniformEvaluator {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl<G: Puzzle> Evaluator<G> for UniformEvaluator {
    fn evaluate(&self, game: &G, state: &G::State) -> Result<Evaluation> {
        let policy = game.legal_mask(state).uniform()?.into_inner();
        Ok(Evaluation {
            policy,
            value: self.value,
        })
    }
}

/// Evaluator using uniform prior and random rollouts.
///
/// - Policy: uniform distribution over legal actions
/// - Value: 1 if a random playout solves the puzzle within the depth limit, else 0
pub struct RolloutEvaluator<R: Rng> {
    /// Random number generator (wrapped in RefCell for interior mutability).
    rng: RefCell<R>,

    /// Maximum depth for random rollouts.
    max_rollout_depth: usize,
}

impl<R: Rng> RolloutEvaluator<R> {
    /// Create a new rollout evaluator.
    ///
    /// # Arguments
    /// * `rng` - Random number generator for rollouts
    /// * `max_rollout_depth` - Maximum moves in a random playout
    pub fn new(rng: R, max_rollout_depth: usize) -> Self {
        Self {
            rng: RefCell::new(rng),
            max_rollout_depth,
        }
    }

    /// Perform a random rollout from the given state.
    fn rollout<G: Puzzle>(&self, game: &G, initial_state: &G::State) -> Value {
        let mut state = initial_state.clone();
        let mut depth = 0;

        while !game.is_terminal(&state) && depth < self.max_rollout_depth {
            let legal_actions = game.legal_actions(&state);
            let idx = self.rng.borrow_mut().gen_range(0..legal_actions.len());
            state = game.apply(&state, legal_actions[idx]);
            depth += 1;
        }

        match game.outcome(&state) {
            Some(outcome) if outcome.is_solved() => Value::SOLVED,
            _ => Value::UNSOLVED,
        }
    }
}

impl<G: Puzzle, R: Rng> Evaluator<G> for RolloutEvaluator<R> {
    fn evaluate(&self, game: &G, state: &G::State) -> Result<Evaluation> {
        let policy = game.legal_mask(state).uniform()?.into_inner();
        let value = self.rollout(game, state).get();

        Ok(Evaluation { policy, value })
    }
}
