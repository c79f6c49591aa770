//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.
//! Statistics live on the edges: one node per distinct state, one edge per legal action.

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Search statistics for one (state, action) pair.
#[derive(Clone, Debug)]
pub struct EdgeStats {
    /// Number of simulations that took this edge.
    pub visit_count: u32,

    /// Sum of values backed up through this edge.
    pub value_sum: f32,

    /// Masked, renormalized prior from the estimator.
    pub prior: f32,
}

impl EdgeStats {
    pub fn new(prior: f32) -> Self {
        Self {
            visit_count: 0,
            value_sum: 0.0,
            prior,
        }
    }

    /// Mean value (Q-value) for this edge.
    ///
    /// Returns 0.0 if the edge has never been visited.
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }
}

/// An outgoing action with its statistics.
#[derive(Clone, Debug)]
pub struct Edge<A> {
    pub action: A,
    pub stats: EdgeStats,

    /// Node reached by this action, resolved on first traversal.
    pub child: Option<NodeId>,
}

impl<A> Edge<A> {
    pub fn new(action: A, prior: f32) -> Self {
        Self {
            action,
            stats: EdgeStats::new(prior),
            child: None,
        }
    }
}

/// A node in the MCTS tree, one per distinct puzzle state.
#[derive(Clone, Debug)]
pub struct Node<A> {
    /// One edge per legal action, in `legal_actions` order.
    pub edges: Vec<Edge<A>>,

    /// Whether edges have been generated.
    pub expanded: bool,

    /// Cached value if the state is terminal.
    pub terminal_value: Option<f32>,
}

impl<A> Node<A> {
    /// Create a new unexpanded node.
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            expanded: false,
            terminal_value: None,
        }
    }

    /// Total visits over all outgoing edges.
    pub fn visit_count(&self) -> u32 {
        self.edges.iter().map(|e| e.stats.visit_count).sum()
    }
}

impl<A> Default for Node<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_stats_mean_value() {
        let mut stats = EdgeStats::new(0.5);

        // Unvisited edge has Q = 0
        assert_eq!(stats.mean_value(), 0.0);

        stats.visit_count = 2;
        stats.value_sum = 1.5;
        assert!((stats.mean_value() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_node_visit_count() {
        let mut node: Node<u8> = Node::new();
        assert!(!node.expanded);
        assert_eq!(node.visit_count(), 0);

        node.edges.push(Edge::new(1, 0.3));
        node.edges.push(Edge::new(2, 0.7));
        node.edges[0].stats.visit_count = 3;
        node.edges[1].stats.visit_count = 4;
        assert_eq!(node.visit_count(), 7);
        assert_eq!(node.edges[1].child, None);
    }
}
