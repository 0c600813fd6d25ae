//! The MCTS search loop.
//!
//! Each iteration runs the four phases:
//! 1. Tree policy: descend by UCT, expanding the first node that still has
//!    untried moves
//! 2. Rollout: play uniformly random moves to a terminal outcome
//! 3. Backpropagation: record the outcome from the leaf up to the root
//! 4. Aggregate statistics update
//!
//! The final move is extracted by the robust-child rule: the root child with
//! the most visits.

use std::time::Instant;

use game_core::{GameState, Outcome, Player};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{MctsConfig, SearchBudget};
use crate::node::NodeId;
use crate::tree::{SearchTree, TreeStats};

/// Errors that can occur configuring or running a search.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The root position is already terminal; there is nothing to search.
    #[error("no legal moves: the position is already terminal")]
    NoLegalMoves,

    /// `expand` was asked for a child of a fully expanded node. Indicates a
    /// tree-policy bug, not a recoverable condition.
    #[error("expand called on a node with no untried moves")]
    NoUntriedMoves,

    /// Zero or two budget modes were configured.
    #[error("budget must set exactly one of max_simulations or time_limit")]
    InvalidBudget,
}

/// Aggregate statistics for one search invocation. Observability only; the
/// search never reads these back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Completed simulations.
    pub simulations: u32,
    /// Simulations that ended in a first-player win.
    pub first_player_wins: u32,
    /// Simulations that ended in a second-player win.
    pub second_player_wins: u32,
    /// Simulations that ended in a draw.
    pub draws: u32,
}

impl SearchStats {
    fn record(&mut self, outcome: Outcome) {
        self.simulations += 1;
        match outcome {
            Outcome::FirstPlayerWin => self.first_player_wins += 1,
            Outcome::SecondPlayerWin => self.second_player_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

/// Monte Carlo Tree Search engine for one position.
///
/// Owns the search tree exclusively; single-threaded and synchronous. Build a
/// fresh engine per position to analyze — `search` itself also starts from a
/// fresh tree on every call, so no statistics leak between invocations.
pub struct Mcts<G: GameState> {
    tree: SearchTree<G>,
    budget: SearchBudget,
    exploration: f64,
    stats: SearchStats,
    rng: ChaCha20Rng,
}

impl<G: GameState> Mcts<G> {
    /// Create an engine for `state` with an entropy-seeded rollout rng.
    pub fn new(state: G, config: MctsConfig) -> Result<Self, SearchError> {
        Self::with_rng(state, config, ChaCha20Rng::from_entropy())
    }

    /// Create an engine with a caller-provided rng, for reproducible searches.
    pub fn with_rng(state: G, config: MctsConfig, rng: ChaCha20Rng) -> Result<Self, SearchError> {
        let budget = config.budget()?;
        Ok(Self {
            tree: SearchTree::new(state),
            budget,
            exploration: config.exploration,
            stats: SearchStats::default(),
            rng,
        })
    }

    /// Run the search until the budget is exhausted and return the best move.
    ///
    /// Fails with [`SearchError::NoLegalMoves`] when the root position is
    /// already terminal. Under a time budget the deadline is checked after
    /// each iteration, so at least one full iteration always completes and no
    /// partial iteration is ever committed.
    pub fn search(&mut self) -> Result<G::Move, SearchError> {
        let root_state = self.tree.get(self.tree.root()).state.clone();
        if root_state.is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }

        // One tree and one stats block per invocation.
        self.tree = SearchTree::new(root_state);
        self.stats = SearchStats::default();

        match self.budget {
            SearchBudget::Simulations(n) => {
                for _ in 0..n {
                    self.simulate()?;
                }
            }
            SearchBudget::TimeLimit(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    self.simulate()?;
                    if Instant::now() >= deadline {
                        break;
                    }
                }
            }
        }

        let best = self.tree.best_move().ok_or(SearchError::NoLegalMoves)?;
        debug!(
            simulations = self.stats.simulations,
            nodes = self.tree.len(),
            best_move = ?best,
            "search complete"
        );
        Ok(best)
    }

    /// One full select -> expand -> rollout -> backpropagate iteration.
    fn simulate(&mut self) -> Result<(), SearchError> {
        let leaf = self.tree_policy()?;
        let outcome = self.rollout(leaf);
        self.tree.backpropagate(leaf, outcome);
        self.stats.record(outcome);

        trace!(leaf = leaf.0, outcome = ?outcome, "simulation complete");
        Ok(())
    }

    /// Descend from the root; expand the first node met that still has
    /// untried moves, or stop at a terminal node.
    fn tree_policy(&mut self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal() {
                return Ok(current);
            }
            if !node.is_fully_expanded() {
                return self.tree.expand(current);
            }
            match self.tree.select_child(current, self.exploration) {
                Some(child) => current = child,
                None => return Ok(current),
            }
        }
    }

    /// Play uniformly random legal moves from the leaf's state until the game
    /// ends, returning the terminal outcome.
    fn rollout(&mut self, leaf: NodeId) -> Outcome {
        let mut state = self.tree.get(leaf).state.clone();
        loop {
            if let Some(outcome) = state.result() {
                return outcome;
            }
            let moves = state.legal_moves();
            debug_assert!(!moves.is_empty(), "non-terminal state must have legal moves");
            let mv = moves[self.rng.gen_range(0..moves.len())];
            state = state.apply(mv);
        }
    }

    /// Aggregate statistics for the last `search` invocation.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Simulations that ended in a win for `player`.
    pub fn wins_for(&self, player: Player) -> u32 {
        match player {
            Player::First => self.stats.first_player_wins,
            Player::Second => self.stats.second_player_wins,
        }
    }

    /// Tree-wide statistics for diagnostics.
    pub fn tree_stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Depth-bounded rendering of the search tree (see [`SearchTree::render`]).
    pub fn render_tree(&self, max_depth: u32) -> String {
        self.tree.render(max_depth)
    }
}
