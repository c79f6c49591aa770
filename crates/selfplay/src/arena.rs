//! Evaluation harness: play the puzzle with a fixed policy and count solves.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sokozero_core::{Outcome, Puzzle, Result};
use sokozero_mcts::{greedy_action, Evaluator, Mcts};
use tracing::{debug, info};

/// Result of one arena episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaOutcome {
    Solved,
    /// Step cap reached, or the board deadlocked first.
    TimedOut,
}

/// Aggregated arena counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaResult {
    pub solved: usize,
    pub timed_out: usize,
}

impl ArenaResult {
    pub fn record(&mut self, outcome: ArenaOutcome) {
        match outcome {
            ArenaOutcome::Solved => self.solved += 1,
            ArenaOutcome::TimedOut => self.timed_out += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.solved + self.timed_out
    }

    /// Fraction of episodes solved, 0 when nothing was played.
    pub fn solve_rate(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.solved as f32 / self.total() as f32
        }
    }
}

/// Plays a puzzle from its initial state with a caller-supplied policy.
pub struct Arena<'a, G: Puzzle> {
    game: &'a G,
    max_steps: usize,
}

impl<'a, G: Puzzle> Arena<'a, G> {
    pub fn new(game: &'a G, max_steps: usize) -> Self {
        Self { game, max_steps }
    }

    /// Play one episode. The policy maps a state to an action index.
    ///
    /// # Panics
    /// Panics if the policy picks an index outside the legal mask.
    pub fn play_episode<P>(&self, policy: &mut P) -> Result<ArenaOutcome>
    where
        P: FnMut(&G::State) -> Result<usize>,
    {
        let game = self.game;
        let mut state = game.initial_state();

        for step in 0..self.max_steps {
            match game.outcome(&state) {
                Some(Outcome::Solved) => {
                    debug!(steps = step, "arena episode solved");
                    return Ok(ArenaOutcome::Solved);
                }
                Some(Outcome::Deadlocked) => {
                    debug!(steps = step, "arena episode deadlocked");
                    return Ok(ArenaOutcome::TimedOut);
                }
                None => {}
            }

            let index = policy(&state)?;
            assert!(
                game.legal_mask(&state).is_legal(index),
                "BUG: policy chose illegal action index {}",
                index
            );
            let action = game
                .index_to_action(index)
                .unwrap_or_else(|| panic!("BUG: legal index {} has no action", index));
            state = game.apply(&state, action);
        }

        match game.outcome(&state) {
            Some(Outcome::Solved) => Ok(ArenaOutcome::Solved),
            _ => {
                debug!(steps = self.max_steps, "arena episode timed out");
                Ok(ArenaOutcome::TimedOut)
            }
        }
    }

    /// Play exactly `n` episodes and count the outcomes.
    pub fn play_episodes<P>(&self, n: usize, policy: &mut P) -> Result<ArenaResult>
    where
        P: FnMut(&G::State) -> Result<usize>,
    {
        let mut result = ArenaResult::default();
        for i in 0..n {
            result.record(self.play_episode(policy)?);

            if (i + 1) % 10 == 0 || i + 1 == n {
                info!(
                    played = i + 1,
                    total = n,
                    solved = result.solved,
                    timed_out = result.timed_out,
                    "arena progress"
                );
            }
        }
        Ok(result)
    }
}

/// Policy that searches each state and plays the most probable action at
/// temperature 0.
pub fn mcts_policy<'m, G, E, R>(
    game: &'m G,
    mcts: &'m mut Mcts<G, E, R>,
) -> impl FnMut(&G::State) -> Result<usize> + 'm
where
    G: Puzzle + 'm,
    E: Evaluator<G> + 'm,
    R: Rng + 'm,
{
    move |state: &G::State| {
        let probs = mcts.action_probabilities(game, state, 0.0)?;
        Ok(greedy_action(&probs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sokozero_mcts::{MctsConfig, RolloutEvaluator};
    use sokozero_sokoban::{Action, Sokoban};

    const ONE_PUSH: &str = "#####\n#@$.#\n#####";

    #[test]
    fn test_one_push_solved_with_mcts() {
        let game = Sokoban::from_level(ONE_PUSH).unwrap();
        let state = game.initial_state();
        assert!(!state.is_solved());

        let rng = ChaCha8Rng::seed_from_u64(0);
        let evaluator = RolloutEvaluator::new(rng.clone(), 10);
        let mut mcts = Mcts::new(MctsConfig::for_evaluation(25), evaluator, rng);

        // solved within two steps of play
        let arena = Arena::new(&game, 2);
        let mut policy = mcts_policy(&game, &mut mcts);
        assert_eq!(arena.play_episode(&mut policy).unwrap(), ArenaOutcome::Solved);

        let next = game.apply(&state, Action::Step { row: 1, col: 2 });
        assert!(next.is_solved());
    }

    #[test]
    fn test_plays_exactly_n_episodes() {
        let game = Sokoban::from_level(ONE_PUSH).unwrap();
        let arena = Arena::new(&game, 5);
        let mut calls = 0;
        let mut policy = |_: &sokozero_sokoban::Board| {
            calls += 1;
            Ok(7)
        };

        let result = arena.play_episodes(7, &mut policy).unwrap();
        assert_eq!(result, ArenaResult { solved: 7, timed_out: 0 });
        assert_eq!(result.total(), 7);
        assert_eq!(calls, 7);
    }

    #[test]
    fn test_step_cap_and_deadlock_time_out() {
        let game = Sokoban::from_level("#######\n#.@  $#\n#######").unwrap();
        let left = game.action_to_index(Action::Step { row: 1, col: 1 });
        let right = game.action_to_index(Action::Step { row: 1, col: 2 });
        let arena = Arena::new(&game, 6);
        let mut toggle = false;
        let mut policy = |_: &sokozero_sokoban::Board| {
            toggle = !toggle;
            Ok(if toggle { left } else { right })
        };
        assert_eq!(arena.play_episode(&mut policy).unwrap(), ArenaOutcome::TimedOut);

        let stuck = Sokoban::from_level("#####\n#@$##\n#####").unwrap();
        let arena = Arena::new(&stuck, 100);
        let mut never = |_: &sokozero_sokoban::Board| -> Result<usize> {
            panic!("deadlocked boards are not played")
        };
        assert_eq!(arena.play_episode(&mut never).unwrap(), ArenaOutcome::TimedOut);
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_illegal_policy_panics() {
        let game = Sokoban::from_level(ONE_PUSH).unwrap();
        let arena = Arena::new(&game, 5);
        let mut policy = |_: &sokozero_sokoban::Board| Ok(0);
        let _ = arena.play_episode(&mut policy);
    }

    #[test]
    fn test_solve_rate() {
        assert_eq!(ArenaResult::default().solve_rate(), 0.0);
        let result = ArenaResult {
            solved: 3,
            timed_out: 1,
        };
        assert!((result.solve_rate() - 0.75).abs() < 1e-6);
    }
}
