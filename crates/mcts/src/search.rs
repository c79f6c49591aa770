//! Monte Carlo Tree Search implementation.
//!
//! Single-agent PUCT search: values are backed up unchanged along the path,
//! never negated between plies. Nodes are shared between all paths reaching
//! the same state, and a simulation that revisits a state already on its
//! path stops there with the unsolved value.

use std::marker::PhantomData;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Dirichlet;
use sokozero_core::{Outcome, Puzzle, Result, SokoZeroError, Value};
use tracing::{trace, warn};

use crate::{
    config::MctsConfig,
    evaluator::Evaluator,
    node::{Edge, NodeId},
    tree::Tree,
};

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    /// Visit count for each legal action at root, in action index order.
    pub visit_counts: Vec<(A, u32)>,

    /// Most visited action (lowest index on ties).
    pub best_action: A,

    /// Policy derived from normalized visit counts.
    /// Length equals `game.num_actions()`, sums to 1.0.
    pub policy: Vec<f32>,

    /// Mean backed-up value at root, or the terminal value of a terminal root.
    pub root_value: f32,
}

impl<A: Copy + Eq> SearchResult<A> {
    /// Distribution over the full action space derived from root visit counts.
    ///
    /// - temperature = 0: all mass on one most-visited action, ties broken
    ///   uniformly at random
    /// - temperature > 0: P(a) proportional to N(a)^(1/temperature)
    ///
    /// A root without visits (terminal root) puts all mass on `best_action`.
    pub fn probabilities<G, R>(&self, game: &G, temperature: f32, rng: &mut R) -> Vec<f32>
    where
        G: Puzzle<Action = A>,
        R: Rng,
    {
        let mut probs = vec![0.0; game.num_actions()];
        let max_count = self.visit_counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

        if max_count == 0 {
            probs[game.action_to_index(self.best_action)] = 1.0;
            return probs;
        }

        if temperature <= 0.0 {
            let maximizers: Vec<A> = self
                .visit_counts
                .iter()
                .filter(|(_, n)| *n == max_count)
                .map(|(a, _)| *a)
                .collect();
            let pick = maximizers[rng.gen_range(0..maximizers.len())];
            probs[game.action_to_index(pick)] = 1.0;
            return probs;
        }

        // Scale by the maximum before exponentiating so large counts and
        // small temperatures stay finite.
        let inv_temp = 1.0 / temperature as f64;
        let weights: Vec<(A, f64)> = self
            .visit_counts
            .iter()
            .map(|(a, n)| (*a, (*n as f64 / max_count as f64).powf(inv_temp)))
            .collect();
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        for (a, w) in weights {
            probs[game.action_to_index(a)] = (w / sum) as f32;
        }
        probs
    }

}

/// Sample an action index from a probability vector.
///
/// Returns None if the vector has no positive mass.
pub fn sample_action<R: Rng>(probs: &[f32], rng: &mut R) -> Option<usize> {
    WeightedIndex::new(probs).ok().map(|dist| dist.sample(rng))
}

/// Index of the largest probability, first one on ties.
pub fn greedy_action(probs: &[f32]) -> usize {
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[best] {
            best = i;
        }
    }
    best
}

/// Monte Carlo Tree Search with PUCT selection.
///
/// Generic over:
/// - `G`: The puzzle being searched
/// - `E`: The evaluation strategy (rollouts or an external estimator)
/// - `R`: The random number generator
pub struct Mcts<G: Puzzle, E: Evaluator<G>, R: Rng> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
    tree: Tree<G::Key, G::Action>,
    _game: PhantomData<G>,
}

impl<G, E, R> Mcts<G, E, R>
where
    G: Puzzle,
    E: Evaluator<G>,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            tree: Tree::new(),
            _game: PhantomData,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Number of distinct states in the tree.
    pub fn tree_size(&self) -> usize {
        self.tree.len()
    }

    /// Discard the tree.
    pub fn reset(&mut self) {
        self.tree.clear();
    }

    /// Run the configured number of simulations from `state`.
    ///
    /// The tree is rebuilt first unless `reuse_tree` is set. A terminal root
    /// runs no simulations and reports its terminal value.
    ///
    /// # Errors
    /// Returns `EstimatorFailure` if the evaluator fails or returns a
    /// malformed evaluation.
    pub fn search(&mut self, game: &G, state: &G::State) -> Result<SearchResult<G::Action>> {
        if !self.config.reuse_tree {
            self.tree.clear();
        }

        if let Some(outcome) = game.outcome(state) {
            return self.terminal_result(game, state, outcome);
        }

        let root = self.tree.get_or_insert(game.state_key(state));
        if !self.tree.get(root).expanded {
            self.expand(game, state, root)?;
        }
        self.add_root_noise(root);

        for _ in 0..self.config.num_simulations {
            self.simulate(game, state, root)?;
        }

        let result = self.extract_results(game, root);
        trace!(
            nodes = self.tree.len(),
            root_value = result.root_value,
            "search finished"
        );
        Ok(result)
    }

    /// Search from `state` and derive the action distribution at `temperature`.
    pub fn action_probabilities(
        &mut self,
        game: &G,
        state: &G::State,
        temperature: f32,
    ) -> Result<Vec<f32>> {
        let result = self.search(game, state)?;
        Ok(result.probabilities(game, temperature, &mut self.rng))
    }

    /// Run a single simulation: select -> expand/evaluate -> backup.
    fn simulate(&mut self, game: &G, root_state: &G::State, root: NodeId) -> Result<()> {
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut on_path = vec![root];
        let mut node_id = root;
        let mut state = root_state.clone();

        let value = loop {
            let node = self.tree.get(node_id);
            if let Some(value) = node.terminal_value {
                break value;
            }
            if !node.expanded {
                break self.expand(game, &state, node_id)?;
            }

            let edge = self.select_edge(node_id);
            let action = self.tree.get(node_id).edges[edge].action;
            state = game.apply(&state, action);
            path.push((node_id, edge));

            let child = match self.tree.get(node_id).edges[edge].child {
                Some(child) => child,
                None => {
                    let child = self.tree.get_or_insert(game.state_key(&state));
                    self.tree.get_mut(node_id).edges[edge].child = Some(child);
                    child
                }
            };

            if on_path.contains(&child) {
                break self.config.unsolved_value;
            }
            on_path.push(child);
            node_id = child;
        };

        self.backup(&path, value);
        Ok(())
    }

    /// Evaluate a leaf and create its edges, returning the value to back up.
    fn expand(&mut self, game: &G, state: &G::State, node_id: NodeId) -> Result<f32> {
        if let Some(outcome) = game.outcome(state) {
            let value = self.config.terminal_value(outcome);
            let node = self.tree.get_mut(node_id);
            node.expanded = true;
            node.terminal_value = Some(value);
            return Ok(value);
        }

        let evaluation = self.evaluator.evaluate(game, state).map_err(estimator_failure)?;
        if evaluation.policy.len() != game.num_actions() {
            return Err(SokoZeroError::EstimatorFailure(format!(
                "policy has {} entries, expected {}",
                evaluation.policy.len(),
                game.num_actions()
            )));
        }
        if evaluation.policy.iter().any(|p| !p.is_finite()) {
            return Err(SokoZeroError::EstimatorFailure(
                "policy contains non-finite entries".to_string(),
            ));
        }
        let value = Value::new(evaluation.value).map_err(estimator_failure)?;

        let mask = game.legal_mask(state);
        let priors = match mask.renormalize(&evaluation.policy) {
            Ok(priors) => priors,
            Err(SokoZeroError::DegenerateMask) => {
                warn!(
                    legal = mask.count(),
                    "estimator put no mass on legal actions, using uniform priors"
                );
                mask.uniform()?
            }
            Err(e) => return Err(estimator_failure(e)),
        };

        let edges: Vec<Edge<G::Action>> = legal_by_index(game, state)
            .into_iter()
            .map(|action| Edge::new(action, priors.get_or_zero(game.action_to_index(action))))
            .collect();

        let node = self.tree.get_mut(node_id);
        node.edges = edges;
        node.expanded = true;
        Ok(value.get())
    }

    /// Select the edge maximizing the PUCT score.
    ///
    /// UCB(a) = Q(a) + c_puct * P(a) * sqrt(max(sum N, 1)) / (1 + N(a))
    /// Edges are stored in action index order, so strict comparison keeps
    /// the lowest index on ties.
    fn select_edge(&self, node_id: NodeId) -> usize {
        let node = self.tree.get(node_id);
        assert!(
            !node.edges.is_empty(),
            "BUG: select_edge called on node without edges"
        );

        let sqrt_total = (node.visit_count().max(1) as f32).sqrt();
        let mut best = 0;
        let mut best_ucb = f32::NEG_INFINITY;

        for (i, edge) in node.edges.iter().enumerate() {
            let stats = &edge.stats;
            let ucb = stats.mean_value()
                + self.config.c_puct * stats.prior * sqrt_total / (1.0 + stats.visit_count as f32);

            if ucb > best_ucb {
                best_ucb = ucb;
                best = i;
            }
        }
        best
    }

    /// Add the value to every edge on the path.
    fn backup(&mut self, path: &[(NodeId, usize)], value: f32) {
        for &(node_id, edge) in path {
            let stats = &mut self.tree.get_mut(node_id).edges[edge].stats;
            stats.visit_count += 1;
            stats.value_sum += value;
        }
    }

    /// Mix Dirichlet noise into the root priors.
    fn add_root_noise(&mut self, root: NodeId) {
        let eps = self.config.exploration_fraction;
        let num_edges = self.tree.get(root).edges.len();

        // Dirichlet requires at least 2 elements
        if eps <= 0.0 || num_edges < 2 {
            return;
        }

        let alpha = vec![self.config.dirichlet_alpha; num_edges];
        let noise: Vec<f32> = match Dirichlet::new(&alpha) {
            Ok(dirichlet) => dirichlet.sample(&mut self.rng),
            Err(e) => {
                warn!(error = %e, "skipping root noise");
                return;
            }
        };

        for (edge, n) in self.tree.get_mut(root).edges.iter_mut().zip(noise) {
            edge.stats.prior = (1.0 - eps) * edge.stats.prior + eps * n;
        }
    }

    /// Result for a terminal root: no simulations, all mass on the legal
    /// action with the lowest index.
    fn terminal_result(
        &self,
        game: &G,
        state: &G::State,
        outcome: Outcome,
    ) -> Result<SearchResult<G::Action>> {
        let legal = legal_by_index(game, state);
        let first = *legal.first().ok_or(SokoZeroError::NoLegalActions)?;

        let mut policy = vec![0.0; game.num_actions()];
        policy[game.action_to_index(first)] = 1.0;

        Ok(SearchResult {
            visit_counts: legal.into_iter().map(|a| (a, 0)).collect(),
            best_action: first,
            policy,
            root_value: self.config.terminal_value(outcome),
        })
    }

    /// Extract search results from root node.
    fn extract_results(&self, game: &G, root: NodeId) -> SearchResult<G::Action> {
        let node = self.tree.get(root);

        let visit_counts: Vec<(G::Action, u32)> = node
            .edges
            .iter()
            .map(|e| (e.action, e.stats.visit_count))
            .collect();

        // INVARIANT: the root is expanded and non-terminal, so it has edges
        let mut best = 0;
        for (i, (_, n)) in visit_counts.iter().enumerate() {
            if *n > visit_counts[best].1 {
                best = i;
            }
        }
        let best_action = visit_counts[best].0;

        let total_visits: u32 = visit_counts.iter().map(|(_, n)| *n).sum();
        let mut policy = vec![0.0; game.num_actions()];
        if total_visits > 0 {
            for (a, n) in &visit_counts {
                policy[game.action_to_index(*a)] = *n as f32 / total_visits as f32;
            }
        } else {
            policy[game.action_to_index(best_action)] = 1.0;
        }

        let root_value = if total_visits > 0 {
            node.edges.iter().map(|e| e.stats.value_sum).sum::<f32>() / total_visits as f32
        } else {
            0.0
        };

        SearchResult {
            visit_counts,
            best_action,
            policy,
            root_value,
        }
    }
}

/// Legal actions in ascending action index order.
fn legal_by_index<G: Puzzle>(game: &G, state: &G::State) -> Vec<G::Action> {
    let mut legal = game.legal_actions(state);
    legal.sort_by_key(|a| game.action_to_index(*a));
    legal
}

fn estimator_failure(err: SokoZeroError) -> SokoZeroError {
    match err {
        SokoZeroError::EstimatorFailure(_) => err,
        other => SokoZeroError::EstimatorFailure(other.to_string()),
    }
}
