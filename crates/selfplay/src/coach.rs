//! Coach loop: parallel self-play iterations feeding a bounded example
//! history, each followed by an arena evaluation and an accept/reject gate.
//!
//! Training itself happens outside this crate; the coach produces the
//! example checkpoints the trainer consumes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sokozero_core::{Puzzle, Result};
use sokozero_mcts::{Evaluator, Mcts};
use tracing::info;

use crate::arena::{mcts_policy, Arena, ArenaResult};
use crate::config::SelfPlayConfig;
use crate::episode::{run_episode, Episode, EpisodeOutcome};
use crate::history::TrainingHistory;

/// Whether a candidate estimator should replace the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Accept,
    Reject,
}

/// Reject iff at least one arena episode was played and the solve rate is
/// below `update_threshold`.
pub fn gate(result: &ArenaResult, update_threshold: f32) -> GateDecision {
    if result.total() > 0 && result.solve_rate() < update_threshold {
        GateDecision::Reject
    } else {
        GateDecision::Accept
    }
}

/// What one coach iteration produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub iteration: usize,
    /// Examples for this iteration came from a loaded checkpoint.
    pub skipped: bool,
    pub episodes: usize,
    pub solved: usize,
    pub deadlocked: usize,
    pub timed_out: usize,
    pub mean_steps: f32,
    pub new_examples: usize,
    pub evicted_iterations: usize,
    pub history_iterations: usize,
    pub history_examples: usize,
    pub arena: Option<ArenaResult>,
    pub decision: Option<GateDecision>,
}

/// Drives self-play iterations for one puzzle.
///
/// `make_evaluator` builds a fresh evaluator from a seed; every episode gets
/// its own evaluator, tree and RNGs, so episodes run in parallel.
pub struct Coach<G, F> {
    game: G,
    config: SelfPlayConfig,
    make_evaluator: F,
    history: TrainingHistory,
}

impl<G, F, E> Coach<G, F>
where
    G: Puzzle<Observation = Vec<f32>>,
    F: Fn(u64) -> E + Sync,
    E: Evaluator<G>,
{
    pub fn new(game: G, config: SelfPlayConfig, make_evaluator: F) -> Self {
        let history = TrainingHistory::new(config.num_iters_for_history, config.max_len_of_queue);
        Self {
            game,
            config,
            make_evaluator,
            history,
        }
    }

    /// Start from a previously saved history.
    pub fn with_history(mut self, history: TrainingHistory) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Seed for episode `episode` of `iteration`.
    pub fn episode_seed(&self, iteration: usize, episode: usize) -> u64 {
        let n = (iteration * self.config.num_episodes + episode) as u64;
        self.config.seed.wrapping_add(n.wrapping_mul(1000))
    }

    /// Play one iteration's episodes in parallel, in episode order.
    pub fn play_episodes(&self, iteration: usize) -> Result<Vec<Episode>> {
        (0..self.config.num_episodes)
            .into_par_iter()
            .map(|i| self.play_one(self.episode_seed(iteration, i)))
            .collect()
    }

    fn play_one(&self, seed: u64) -> Result<Episode> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let evaluator = (self.make_evaluator)(seed.wrapping_add(1));
        let mut mcts = Mcts::new(
            self.config.mcts_config(),
            evaluator,
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(2)),
        );
        run_episode(&self.game, &mut mcts, &self.config, &mut rng)
    }

    /// Run one iteration of self-play and add its examples to the history.
    ///
    /// Right after loading a checkpoint the first iteration is skipped, since
    /// its examples are already in the history.
    pub fn run_iteration(&mut self, iteration: usize) -> Result<IterationSummary> {
        if self.history.take_skip_first() {
            info!(iteration, "examples already loaded, skipping self-play");
            return Ok(self.summary(iteration, true, &[], 0, 0));
        }

        let episodes = self.play_episodes(iteration)?;
        let examples: Vec<_> = episodes
            .iter()
            .flat_map(|e| e.examples.iter().cloned())
            .collect();
        let new_examples = examples.len();
        let evicted = self.history.push_iteration(examples);

        let summary = self.summary(iteration, false, &episodes, new_examples, evicted);
        info!(
            iteration,
            episodes = summary.episodes,
            solved = summary.solved,
            deadlocked = summary.deadlocked,
            timed_out = summary.timed_out,
            examples = new_examples,
            history_examples = summary.history_examples,
            "self-play iteration finished"
        );
        Ok(summary)
    }

    /// Play the arena with zero-temperature MCTS.
    pub fn evaluate(&self, seed: u64) -> Result<ArenaResult> {
        let evaluator = (self.make_evaluator)(seed.wrapping_add(1));
        let mut mcts = Mcts::new(
            self.config.arena_mcts_config(),
            evaluator,
            ChaCha8Rng::seed_from_u64(seed),
        );
        let arena = Arena::new(&self.game, self.config.arena_max_steps);
        let mut policy = mcts_policy(&self.game, &mut mcts);
        arena.play_episodes(self.config.arena_compare, &mut policy)
    }

    /// Run all configured iterations: self-play, checkpoint, arena, gate.
    ///
    /// `on_iteration` sees each finished summary, e.g. to persist it.
    pub fn learn<C>(&mut self, mut on_iteration: C) -> anyhow::Result<Vec<IterationSummary>>
    where
        C: FnMut(&IterationSummary) -> anyhow::Result<()>,
    {
        let mut summaries = Vec::with_capacity(self.config.num_iterations);

        for iteration in 1..=self.config.num_iterations {
            info!(iteration, "starting iteration");
            let mut summary = self.run_iteration(iteration)?;

            // examples were gathered with the previous iteration's estimator
            let path = self.history.save(&self.config.checkpoint, iteration - 1)?;
            info!(path = ?path, "saved training examples");

            let arena = self.evaluate(self.episode_seed(iteration, self.config.num_episodes))?;
            let decision = gate(&arena, self.config.update_threshold);
            info!(
                iteration,
                solved = arena.solved,
                timed_out = arena.timed_out,
                decision = ?decision,
                "arena finished"
            );

            summary.arena = Some(arena);
            summary.decision = Some(decision);
            on_iteration(&summary)?;
            summaries.push(summary);
        }

        Ok(summaries)
    }

    fn summary(
        &self,
        iteration: usize,
        skipped: bool,
        episodes: &[Episode],
        new_examples: usize,
        evicted_iterations: usize,
    ) -> IterationSummary {
        let count =
            |outcome: EpisodeOutcome| episodes.iter().filter(|e| e.outcome == outcome).count();
        let mean_steps = if episodes.is_empty() {
            0.0
        } else {
            episodes.iter().map(|e| e.steps).sum::<usize>() as f32 / episodes.len() as f32
        };

        IterationSummary {
            iteration,
            skipped,
            episodes: episodes.len(),
            solved: count(EpisodeOutcome::Solved),
            deadlocked: count(EpisodeOutcome::Deadlocked),
            timed_out: count(EpisodeOutcome::TimedOut),
            mean_steps,
            new_examples,
            evicted_iterations,
            history_iterations: self.history.len(),
            history_examples: self.history.num_examples(),
            arena: None,
            decision: None,
        }
    }
}
