use std::fmt::Debug;
use std::hash::Hash;

use crate::{LegalMask, Outcome};

/// A single-agent puzzle abstraction for tree search.
///
/// This trait defines the interface that any puzzle must implement to be
/// searched by MCTS and driven by the self-play loop. Unlike adversarial
/// games there is only one agent, so values are never negated between plies.
pub trait Puzzle: Clone + Send + Sync {
    /// The puzzle state (e.g., a Sokoban board)
    type State: Clone + Send;

    /// A puzzle action
    type Action: Clone + Copy + Send + Eq + Hash + Debug;

    /// Canonical key used to merge identical states reached by different paths
    type Key: Clone + Eq + Hash;

    /// The observation format for the estimator
    type Observation: Clone;

    /// Returns the initial puzzle state
    fn initial_state(&self) -> Self::State;

    /// Returns all legal actions from the given state.
    ///
    /// Never empty: when nothing else is legal the pass action is returned.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Applies an action, returning a new state (immutable operation).
    ///
    /// # Panics
    /// Panics if `action` is not in `legal_actions(state)`. Callers must mask
    /// against the legal actions before applying.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// Returns how the puzzle ended, or `None` if the state is not terminal.
    fn outcome(&self, state: &Self::State) -> Option<Outcome>;

    /// Returns true if the puzzle has ended (solved or deadlocked)
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.outcome(state).is_some()
    }

    /// Canonical key for the state
    fn state_key(&self, state: &Self::State) -> Self::Key;

    /// Converts a state to the estimator's observation format
    fn observe(&self, state: &Self::State) -> Self::Observation;

    /// Maps an action to a flat index for the policy vector
    fn action_to_index(&self, action: Self::Action) -> usize;

    /// Maps a flat index back to an action, returning None if invalid
    fn index_to_action(&self, index: usize) -> Option<Self::Action>;

    /// Total number of possible action indices (size of policy vector)
    fn num_actions(&self) -> usize;

    /// Legal actions of `state` as a mask over the full action space
    fn legal_mask(&self, state: &Self::State) -> LegalMask {
        LegalMask::from_indices(
            self.num_actions(),
            self.legal_actions(state)
                .into_iter()
                .map(|action| self.action_to_index(action)),
        )
    }

    /// Symmetric variants of an (observation, policy) pair for data augmentation.
    ///
    /// The default implementation knows no symmetries and returns the pair itself.
    fn symmetries(
        &self,
        observation: &Self::Observation,
        policy: &[f32],
    ) -> Vec<(Self::Observation, Vec<f32>)> {
        vec![(observation.clone(), policy.to_vec())]
    }
}
