//! Self-play configuration bundle.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use sokozero_mcts::MctsConfig;

/// Everything the coach loop needs, gathered in one place.
///
/// Defaults mirror the reference training driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Coach iterations to run.
    pub num_iterations: usize,

    /// Self-play episodes per iteration.
    pub num_episodes: usize,

    /// MCTS simulations per decision.
    pub num_simulations: usize,

    /// PUCT exploration weight.
    pub c_puct: f32,

    /// Steps below this count are played at temperature 1, later ones greedily.
    pub temperature_threshold: usize,

    /// Step cap for a self-play episode.
    pub max_episode_steps: usize,

    /// Newest examples kept per iteration.
    pub max_len_of_queue: usize,

    /// Iterations of examples kept in the history.
    pub num_iters_for_history: usize,

    /// Arena episodes after each iteration.
    pub arena_compare: usize,

    /// Step cap for an arena episode.
    pub arena_max_steps: usize,

    /// Minimum arena solve rate to accept a model.
    pub update_threshold: f32,

    /// Outcome recorded for episodes that did not solve the puzzle.
    pub unsolved_value: f32,

    /// Dirichlet alpha for root noise.
    pub dirichlet_alpha: f32,

    /// Root noise mixing fraction, 0 disables noise.
    pub exploration_fraction: f32,

    /// Keep one tree for a whole episode.
    pub reuse_tree: bool,

    /// Base seed; each episode derives its own.
    pub seed: u64,

    /// Directory for example checkpoints.
    pub checkpoint: PathBuf,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_iterations: 1000,
            num_episodes: 100,
            num_simulations: 25,
            c_puct: 1.0,
            temperature_threshold: 15,
            max_episode_steps: 10_000,
            max_len_of_queue: 200_000,
            num_iters_for_history: 20,
            arena_compare: 40,
            arena_max_steps: 10_000,
            update_threshold: 0.6,
            unsolved_value: 0.0,
            dirichlet_alpha: 0.3,
            exploration_fraction: 0.0,
            reuse_tree: false,
            seed: 42,
            checkpoint: PathBuf::from("./temp/"),
        }
    }
}

impl SelfPlayConfig {
    /// Check the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            bail!("num_simulations must be at least 1");
        }
        if !(self.c_puct.is_finite() && self.c_puct >= 0.0) {
            bail!("c_puct must be a non-negative number, got {}", self.c_puct);
        }
        if !(0.0..=1.0).contains(&self.update_threshold) {
            bail!(
                "update_threshold must be in [0, 1], got {}",
                self.update_threshold
            );
        }
        if !(-1.0..=1.0).contains(&self.unsolved_value) {
            bail!(
                "unsolved_value must be in [-1, 1], got {}",
                self.unsolved_value
            );
        }
        if !(0.0..=1.0).contains(&self.exploration_fraction) {
            bail!(
                "exploration_fraction must be in [0, 1], got {}",
                self.exploration_fraction
            );
        }
        if self.num_iters_for_history == 0 {
            bail!("num_iters_for_history must be at least 1");
        }
        Ok(())
    }

    /// Search settings for self-play.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig {
            num_simulations: self.num_simulations,
            c_puct: self.c_puct,
            dirichlet_alpha: self.dirichlet_alpha,
            exploration_fraction: self.exploration_fraction,
            unsolved_value: self.unsolved_value,
            reuse_tree: self.reuse_tree,
            ..MctsConfig::default()
        }
    }

    /// Search settings for arena play: no noise.
    pub fn arena_mcts_config(&self) -> MctsConfig {
        MctsConfig {
            c_puct: self.c_puct,
            unsolved_value: self.unsolved_value,
            ..MctsConfig::for_evaluation(self.num_simulations)
        }
    }

    /// Temperature for the 0-based episode step.
    ///
    /// Decisions are counted from 1, so only the first
    /// `temperature_threshold - 1` of them are sampled at temperature 1.
    pub fn effective_temperature(&self, step: usize) -> f32 {
        if step + 1 < self.temperature_threshold {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelfPlayConfig::default();
        assert_eq!(config.num_simulations, 25);
        assert_eq!(config.temperature_threshold, 15);
        assert_eq!(config.max_len_of_queue, 200_000);
        assert_eq!(config.num_iters_for_history, 20);
        assert_eq!(config.arena_compare, 40);
        assert!((config.update_threshold - 0.6).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_temperature() {
        let config = SelfPlayConfig {
            temperature_threshold: 3,
            ..Default::default()
        };
        assert_eq!(config.effective_temperature(0), 1.0);
        assert_eq!(config.effective_temperature(1), 1.0);
        assert_eq!(config.effective_temperature(2), 0.0);
        assert_eq!(config.effective_temperature(3), 0.0);
        assert_eq!(config.effective_temperature(100), 0.0);

        let greedy = SelfPlayConfig {
            temperature_threshold: 1,
            ..Default::default()
        };
        assert_eq!(greedy.effective_temperature(0), 0.0);

        let default = SelfPlayConfig::default();
        assert_eq!(default.effective_temperature(13), 1.0);
        assert_eq!(default.effective_temperature(14), 0.0);
    }

    #[test]
    fn test_mcts_configs() {
        let config = SelfPlayConfig {
            num_simulations: 7,
            c_puct: 2.0,
            exploration_fraction: 0.25,
            ..Default::default()
        };
        let search = config.mcts_config();
        assert_eq!(search.num_simulations, 7);
        assert_eq!(search.c_puct, 2.0);
        assert_eq!(search.exploration_fraction, 0.25);

        let arena = config.arena_mcts_config();
        assert_eq!(arena.num_simulations, 7);
        assert_eq!(arena.c_puct, 2.0);
        assert_eq!(arena.exploration_fraction, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            SelfPlayConfig {
                num_simulations: 0,
                ..Default::default()
            },
            SelfPlayConfig {
                update_threshold: 1.5,
                ..Default::default()
            },
            SelfPlayConfig {
                unsolved_value: -2.0,
                ..Default::default()
            },
            SelfPlayConfig {
                c_puct: f32::NAN,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_json_roundtrip_with_missing_fields() {
        let config: SelfPlayConfig = serde_json::from_str(r#"{"num_episodes": 3}"#).unwrap();
        assert_eq!(config.num_episodes, 3);
        assert_eq!(config.num_simulations, 25);

        let text = serde_json::to_string(&config).unwrap();
        let back: SelfPlayConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
