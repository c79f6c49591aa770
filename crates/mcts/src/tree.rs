//! Arena-allocated MCTS tree with a state-key index.
//!
//! Nodes live in a Vec and are addressed by index. A map from state key to
//! node merges states reached along different move sequences, so the
//! "tree" is really a graph and may contain cycles.

use std::collections::HashMap;
use std::hash::Hash;

use crate::node::{Node, NodeId};

#[derive(Debug)]
pub struct Tree<K, A> {
    nodes: Vec<Node<A>>,
    index: HashMap<K, NodeId>,
}

impl<K: Clone + Eq + Hash, A> Tree<K, A> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<A> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<A> {
        &mut self.nodes[id.0]
    }

    /// Node for `key`, adding a fresh unexpanded one if the state is new.
    pub fn get_or_insert(&mut self, key: K) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new());
        self.index.insert(key, id);
        id
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl<K: Clone + Eq + Hash, A> Default for Tree<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_creation() {
        let tree: Tree<String, u8> = Tree::new();
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_same_key_same_node() {
        let mut tree: Tree<String, u8> = Tree::new();
        let a = tree.get_or_insert("a".to_string());
        let b = tree.get_or_insert("b".to_string());
        let again = tree.get_or_insert("a".to_string());

        assert_ne!(a, b);
        assert_eq!(a, again);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get_or_insert("b".to_string()), b);
    }

    #[test]
    fn test_tree_clear() {
        let mut tree: Tree<u32, u8> = Tree::new();
        let id = tree.get_or_insert(1);
        tree.get_mut(id).expanded = true;
        tree.get_or_insert(2);
        assert_eq!(tree.len(), 2);

        tree.clear();
        assert_eq!(tree.len(), 0);

        // Keys are reissued fresh after clearing
        let id = tree.get_or_insert(1);
        assert!(!tree.get(id).expanded);
    }
}
