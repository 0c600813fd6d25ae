//! Search-tree node representation.
//!
//! Each node wraps the game state reached by taking a move from its parent and
//! carries the visit and outcome statistics UCT selection reads.

use game_core::{GameState, Outcome, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Fixed per-outcome counters accumulated by backpropagation.
///
/// The counters are written sign-free; the signed exploitation term is derived
/// lazily at selection time from the perspective of a given player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub first_player_wins: u32,
    pub second_player_wins: u32,
    pub draws: u32,
}

impl OutcomeTally {
    /// Record one simulated terminal outcome.
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::FirstPlayerWin => self.first_player_wins += 1,
            Outcome::SecondPlayerWin => self.second_player_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Simulations through this node that ended in a win for `player`.
    #[inline]
    pub fn wins_for(&self, player: Player) -> u32 {
        match player {
            Player::First => self.first_player_wins,
            Player::Second => self.second_player_wins,
        }
    }

    /// Total simulations recorded.
    #[inline]
    pub fn total(&self) -> u32 {
        self.first_player_wins + self.second_player_wins + self.draws
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node<G: GameState> {
    /// Parent node index (NONE for root). Non-owning back-reference used only
    /// for backpropagation traversal.
    pub parent: NodeId,

    /// Move that led to this node from the parent (None for root).
    pub mv: Option<G::Move>,

    /// Game state at this node.
    pub state: G,

    /// The player about to move here, snapshot at construction.
    pub player_to_move: Player,

    /// Number of times backpropagation has passed through this node.
    pub visit_count: u32,

    /// Outcome counters for every simulation through this node.
    pub tally: OutcomeTally,

    /// Child node indices. Order carries no meaning.
    pub children: Vec<NodeId>,

    /// Legal moves not yet expanded into children. Snapshot of
    /// `legal_moves()` at construction, popped once per expansion, never
    /// refilled.
    pub untried_moves: Vec<G::Move>,
}

impl<G: GameState> Node<G> {
    /// Create the root node for a search.
    pub fn new_root(state: G) -> Self {
        Self::new(state, NodeId::NONE, None)
    }

    /// Create a child node reached by `mv` from `parent`.
    pub fn new_child(parent: NodeId, mv: G::Move, state: G) -> Self {
        Self::new(state, parent, Some(mv))
    }

    fn new(state: G, parent: NodeId, mv: Option<G::Move>) -> Self {
        let player_to_move = state.to_move();
        let untried_moves = state.legal_moves();
        Self {
            parent,
            mv,
            state,
            player_to_move,
            visit_count: 0,
            tally: OutcomeTally::default(),
            children: Vec::new(),
            untried_moves,
        }
    }

    /// Whether the wrapped state is terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// A node is fully expanded when it is terminal or every legal move has
    /// become a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.is_terminal() || self.untried_moves.is_empty()
    }

    /// Mean value from the perspective of this node's `player_to_move`:
    /// `(wins for them - wins for the opponent) / visits`, in [-1, 1].
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            return 0.0;
        }
        let wins = f64::from(self.tally.wins_for(self.player_to_move));
        let losses = f64::from(self.tally.wins_for(self.player_to_move.opponent()));
        (wins - losses) / f64::from(self.visit_count)
    }

    /// UCT score of this node as a candidate child.
    ///
    /// Unvisited children score infinity so every child is tried at least once
    /// before any is revisited. Otherwise the exploitation term is
    /// `-mean_value()`: the stored value is from this node's own mover, who is
    /// the opponent of the parent doing the selecting, so it is negated.
    ///
    /// Takes pre-computed `ln(parent visits)` to avoid redundant log calls
    /// when comparing siblings.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let exploitation = -self.mean_value();
        let bonus = exploration * (parent_visits_ln / f64::from(self.visit_count)).sqrt();
        exploitation + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::TicTacToe;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_tally_record_and_read() {
        let mut tally = OutcomeTally::default();
        tally.record(Outcome::FirstPlayerWin);
        tally.record(Outcome::FirstPlayerWin);
        tally.record(Outcome::SecondPlayerWin);
        tally.record(Outcome::Draw);

        assert_eq!(tally.wins_for(Player::First), 2);
        assert_eq!(tally.wins_for(Player::Second), 1);
        assert_eq!(tally.draws, 1);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_new_root_snapshots_moves() {
        let node: Node<TicTacToe> = Node::new_root(TicTacToe::new());

        assert!(node.parent.is_none());
        assert_eq!(node.mv, None);
        assert_eq!(node.player_to_move, Player::First);
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.untried_moves.len(), 9);
        assert!(node.children.is_empty());
        assert!(!node.is_fully_expanded());
    }

    #[test]
    fn test_terminal_node_is_fully_expanded() {
        let mut state = TicTacToe::new();
        for mv in [0, 3, 1, 4, 2] {
            state = state.apply(mv);
        }
        let node: Node<TicTacToe> = Node::new_root(state);

        assert!(node.is_terminal());
        assert!(node.is_fully_expanded());
        assert!(node.untried_moves.is_empty());
    }

    #[test]
    fn test_mean_value_sign() {
        // First player to move here; tallies favor the first player.
        let mut node: Node<TicTacToe> = Node::new_root(TicTacToe::new());
        node.visit_count = 4;
        node.tally.first_player_wins = 3;
        node.tally.second_player_wins = 1;

        assert!((node.mean_value() - 0.5).abs() < 1e-9);

        // Same tallies seen by the other mover flip the sign.
        let mut flipped: Node<TicTacToe> = Node::new_root(TicTacToe::new().apply(4));
        flipped.visit_count = 4;
        flipped.tally.first_player_wins = 3;
        flipped.tally.second_player_wins = 1;
        assert_eq!(flipped.player_to_move, Player::Second);
        assert!((flipped.mean_value() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unvisited_child_scores_infinity() {
        let node: Node<TicTacToe> = Node::new_root(TicTacToe::new());
        assert_eq!(node.uct_score(2.0_f64.ln(), 1.0), f64::INFINITY);
    }

    #[test]
    fn test_uct_score_negates_child_value() {
        // Child where the second player moves next; first-player wins dominate,
        // so from the first-player parent this child is attractive.
        let mut child: Node<TicTacToe> = Node::new_root(TicTacToe::new().apply(4));
        child.visit_count = 10;
        child.tally.first_player_wins = 8;
        child.tally.second_player_wins = 2;

        // child.mean_value() = (2 - 8) / 10 = -0.6 from its own mover
        assert!((child.mean_value() + 0.6).abs() < 1e-9);

        // Pure exploitation: parent sees +0.6
        let score = child.uct_score(100.0_f64.ln(), 0.0);
        assert!((score - 0.6).abs() < 1e-9);

        // Exploration bonus adds c * sqrt(ln(N) / n)
        let score = child.uct_score(100.0_f64.ln(), 1.0);
        let expected = 0.6 + (100.0_f64.ln() / 10.0).sqrt();
        assert!((score - expected).abs() < 1e-9);
    }
}
