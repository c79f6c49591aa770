//! Self-play episode generation.
//!
//! An episode plays the puzzle from its initial state with MCTS, recording
//! one training example per symmetric variant of every visited position.
//! Outcomes are filled in once the episode ends.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sokozero_core::{Outcome, Puzzle, Result, SokoZeroError, Value};
use sokozero_mcts::{sample_action, Evaluator, Mcts};
use tracing::debug;

use crate::config::SelfPlayConfig;

/// One (observation, search policy, outcome) triple for the trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Estimator input for the position.
    pub observation: Vec<f32>,

    /// Visit-count distribution over the full action space.
    pub policy: Vec<f32>,

    /// Episode result: 1 if solved, the unsolved value otherwise.
    pub outcome: f32,
}

/// How a self-play episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    Solved,
    /// No legal move remained.
    Deadlocked,
    /// The step cap was reached.
    TimedOut,
}

impl EpisodeOutcome {
    pub fn is_solved(self) -> bool {
        matches!(self, EpisodeOutcome::Solved)
    }
}

impl From<Outcome> for EpisodeOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Solved => EpisodeOutcome::Solved,
            Outcome::Deadlocked => EpisodeOutcome::Deadlocked,
        }
    }
}

/// A finished episode.
#[derive(Clone, Debug)]
pub struct Episode {
    pub examples: Vec<TrainingExample>,
    pub outcome: EpisodeOutcome,
    /// Actions applied.
    pub steps: usize,
}

/// Play one self-play episode.
///
/// The search tree is reset at the start; with `reuse_tree` it then
/// persists across the steps of this episode.
///
/// # Errors
/// Propagates estimator failures from the search.
pub fn run_episode<G, E, R, S>(
    game: &G,
    mcts: &mut Mcts<G, E, R>,
    config: &SelfPlayConfig,
    rng: &mut S,
) -> Result<Episode>
where
    G: Puzzle<Observation = Vec<f32>>,
    E: Evaluator<G>,
    R: Rng,
    S: Rng,
{
    mcts.reset();

    let mut state = game.initial_state();
    let mut recorded: Vec<(Vec<f32>, Vec<f32>)> = Vec::new();
    let mut steps = 0;

    let outcome = loop {
        if let Some(outcome) = game.outcome(&state) {
            break EpisodeOutcome::from(outcome);
        }
        if steps >= config.max_episode_steps {
            break EpisodeOutcome::TimedOut;
        }

        let temperature = config.effective_temperature(steps);
        let probs = mcts.action_probabilities(game, &state, temperature)?;

        let observation = game.observe(&state);
        recorded.extend(game.symmetries(&observation, &probs));

        let index = sample_action(&probs, rng).ok_or_else(|| {
            SokoZeroError::InvalidPolicy("action distribution has no mass".to_string())
        })?;
        let action = game.index_to_action(index).ok_or_else(|| {
            SokoZeroError::InvalidPolicy(format!("sampled index {} is out of range", index))
        })?;

        debug!(step = steps, index, temperature, "self-play step");
        state = game.apply(&state, action);
        steps += 1;
    };

    let value = if outcome.is_solved() {
        Value::SOLVED.get()
    } else {
        config.unsolved_value
    };

    let examples = recorded
        .into_iter()
        .map(|(observation, policy)| TrainingExample {
            observation,
            policy,
            outcome: value,
        })
        .collect();

    Ok(Episode {
        examples,
        outcome,
        steps,
    })
}
