//! Arena-backed search tree.
//!
//! Nodes live in a contiguous `Vec` and refer to each other by `NodeId`
//! indices. Each child is exclusively owned by the arena; the parent link is a
//! plain index used only to walk upward during backpropagation, so there is no
//! shared ownership anywhere in the structure.

use std::cmp::Ordering;
use std::fmt::Write as _;

use game_core::{GameState, Outcome};

use crate::node::{Node, NodeId};
use crate::search::SearchError;

/// Search tree with arena-based node storage, rooted at index 0.
#[derive(Debug)]
pub struct SearchTree<G: GameState> {
    nodes: Vec<Node<G>>,
    root: NodeId,
}

impl<G: GameState> SearchTree<G> {
    /// Create a tree containing only the root for the given position.
    pub fn new(root_state: G) -> Self {
        Self {
            nodes: vec![Node::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: Node<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Expand one untried move of `id` into a new child and return it.
    ///
    /// Fails with [`SearchError::NoUntriedMoves`] if the node has no untried
    /// moves left; the tree policy must never ask for that.
    pub fn expand(&mut self, id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.get_mut(id);
        let mv = node.untried_moves.pop().ok_or(SearchError::NoUntriedMoves)?;
        let next_state = node.state.apply(mv);

        let child_id = self.allocate(Node::new_child(id, mv, next_state));
        self.get_mut(id).children.push(child_id);
        Ok(child_id)
    }

    /// Select the child of `id` with the highest UCT score.
    ///
    /// Unvisited children score infinity, so every child is visited once
    /// before any is revisited. Ties resolve to the last maximum, which is
    /// deterministic for a fixed tree.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        // ln(0) would poison the bonus with NaN; with zero parent visits every
        // child is unvisited and scores infinity anyway.
        let parent_visits_ln = f64::from(node.visit_count.max(1)).ln();

        node.children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let score_a = self.get(a).uct_score(parent_visits_ln, exploration);
                let score_b = self.get(b).uct_score(parent_visits_ln, exploration);
                score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal)
            })
    }

    /// Walk from `id` to the root inclusive, counting the visit and recording
    /// the outcome at every node on the path.
    pub fn backpropagate(&mut self, id: NodeId, outcome: Outcome) {
        let mut current = id;
        while current.is_some() {
            let node = self.get_mut(current);
            node.visit_count += 1;
            node.tally.record(outcome);
            current = node.parent;
        }
    }

    /// Robust-child extraction: the move of the root child with the most
    /// visits. `None` if the root has no children.
    pub fn best_move(&self) -> Option<G::Move> {
        let root = self.get(self.root);
        root.children
            .iter()
            .copied()
            .max_by_key(|&id| self.get(id).visit_count)
            .and_then(|id| self.get(id).mv)
    }

    /// Tree-wide statistics for diagnostics.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, id: NodeId, depth: u32) -> u32 {
        let node = self.get(id);
        node.children
            .iter()
            .map(|&child| self.compute_max_depth(child, depth + 1))
            .max()
            .unwrap_or(depth)
    }

    /// Depth-bounded human-readable rendering of the tree.
    ///
    /// One line per node: incoming move, visit count, mean value, and the
    /// mover at that node. Children are listed in descending visit order.
    /// Purely observational; search state is untouched.
    pub fn render(&self, max_depth: u32) -> String {
        let mut out = String::from("MCTS search tree\n");
        self.render_node(&mut out, self.root, "", true, 0, max_depth);
        out
    }

    fn render_node(
        &self,
        out: &mut String,
        id: NodeId,
        prefix: &str,
        is_last: bool,
        depth: u32,
        max_depth: u32,
    ) {
        if depth > max_depth {
            return;
        }

        let node = self.get(id);
        let connector = if depth == 0 {
            ""
        } else if is_last {
            "└── "
        } else {
            "├── "
        };
        let label = match node.mv {
            Some(mv) => format!("move {mv:?}"),
            None => "root".to_string(),
        };
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{prefix}{connector}{label} | n={} q={:+.3} to_move={}",
            node.visit_count,
            node.mean_value(),
            node.player_to_move,
        );

        let child_prefix = if depth == 0 {
            String::new()
        } else {
            format!("{prefix}{}", if is_last { "    " } else { "│   " })
        };

        let mut children = node.children.clone();
        children.sort_by_key(|&id| std::cmp::Reverse(self.get(id).visit_count));
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            self.render_node(out, child, &child_prefix, i == last, depth + 1, max_depth);
        }
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
