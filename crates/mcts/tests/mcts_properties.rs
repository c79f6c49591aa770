//! Property-based tests for the MCTS implementation on Sokoban levels.
//!
//! - Visit policy sums to 1.0 and only covers legal actions
//! - Root visit counts add up to the simulation count
//! - Action probabilities are normalized at every temperature
//! - Zero temperature yields a one-hot distribution
//! - Same seed, same result

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sokozero_core::Puzzle;
use sokozero_mcts::{Mcts, MctsConfig, RolloutEvaluator};
use sokozero_sokoban::{Board, Sokoban};

/// Tolerance for policy sum validation
const POLICY_SUM_TOLERANCE: f32 = 1e-5;

const LEVELS: [&str; 4] = [
    "#####\n#@$.#\n#####",
    "######\n#    #\n# $$ #\n#@ ..#\n######",
    "  ####\n###  #\n#.$@ #\n# *.*#\n######",
    "#######\n#.  $ #\n# #@# #\n#  $ .#\n#######",
];

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Generate a random number of simulations (kept small for fast tests)
fn arb_simulations() -> impl Strategy<Value = usize> {
    1usize..80
}

/// A level and a board reached from it by a short random walk.
fn arb_position() -> impl Strategy<Value = (Sokoban, Board)> {
    (0..LEVELS.len(), 0usize..12, arb_seed()).prop_map(|(level, steps, seed)| {
        let game = Sokoban::from_level(LEVELS[level]).unwrap();
        let mut state = game.initial_state();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..steps {
            if game.is_terminal(&state) {
                break;
            }
            let actions = game.legal_actions(&state);
            let idx = rand::Rng::gen_range(&mut rng, 0..actions.len());
            state = game.apply(&state, actions[idx]);
        }

        (game, state)
    })
}

fn create_mcts(
    seed: u64,
    simulations: usize,
) -> Mcts<Sokoban, RolloutEvaluator<ChaCha8Rng>, ChaCha8Rng> {
    let config = MctsConfig::with_simulations(simulations);
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let evaluator = RolloutEvaluator::new(rng.clone(), 20);
    Mcts::new(config, evaluator, rng)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_policy_sums_to_one_over_legal_actions(
        seed in arb_seed(),
        simulations in arb_simulations(),
        (game, state) in arb_position()
    ) {
        let mut mcts = create_mcts(seed, simulations);
        let result = mcts.search(&game, &state).unwrap();

        let policy_sum: f32 = result.policy.iter().sum();
        prop_assert!(
            (policy_sum - 1.0).abs() < POLICY_SUM_TOLERANCE,
            "Policy sum {} is not 1.0",
            policy_sum
        );

        let mask = game.legal_mask(&state);
        for (i, &p) in result.policy.iter().enumerate() {
            prop_assert!(p >= 0.0);
            if p > 0.0 {
                prop_assert!(mask.is_legal(i), "mass on illegal action {}", i);
            }
        }
    }

    #[test]
    fn prop_root_visits_equal_simulations(
        seed in arb_seed(),
        simulations in arb_simulations(),
        (game, state) in arb_position()
    ) {
        prop_assume!(!game.is_terminal(&state));

        let mut mcts = create_mcts(seed, simulations);
        let result = mcts.search(&game, &state).unwrap();

        let total: u32 = result.visit_counts.iter().map(|(_, n)| *n).sum();
        prop_assert_eq!(total as usize, simulations);
        prop_assert!(result.root_value >= 0.0 && result.root_value <= 1.0);
    }

    #[test]
    fn prop_probabilities_normalized(
        seed in arb_seed(),
        simulations in arb_simulations(),
        temperature in prop::sample::select(vec![0.0f32, 0.25, 0.5, 1.0, 2.0]),
        (game, state) in arb_position()
    ) {
        let mut mcts = create_mcts(seed, simulations);
        let probs = mcts.action_probabilities(&game, &state, temperature).unwrap();

        prop_assert_eq!(probs.len(), game.num_actions());
        let sum: f32 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < POLICY_SUM_TOLERANCE);

        let mask = game.legal_mask(&state);
        for (i, &p) in probs.iter().enumerate() {
            if p > 0.0 {
                prop_assert!(mask.is_legal(i));
            }
        }

        if temperature == 0.0 {
            prop_assert_eq!(probs.iter().filter(|&&p| p == 1.0).count(), 1);
        }
    }

    #[test]
    fn prop_deterministic_with_seed(
        seed in arb_seed(),
        simulations in arb_simulations(),
        (game, state) in arb_position()
    ) {
        let first = create_mcts(seed, simulations)
            .action_probabilities(&game, &state, 1.0)
            .unwrap();
        let second = create_mcts(seed, simulations)
            .action_probabilities(&game, &state, 1.0)
            .unwrap();
        prop_assert_eq!(first, second);
    }
}
