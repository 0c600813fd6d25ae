//! Core contract between game implementations and the search engine.
//!
//! This crate defines the minimal interface a deterministic, perfect-information,
//! zero-sum two-player game must expose to be searchable:
//! - `Player`: whose turn it is
//! - `Outcome`: the closed set of terminal results
//! - `GameState`: legality, termination, result, and transition queries
//!
//! The engine consumes nothing beyond this trait. Board layout, rendering, and
//! rule logic stay inside the game crate implementing it.

use std::fmt;

/// One of the two players. `First` always moves first from the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// The outcome in which this player wins.
    #[inline]
    pub fn wins(self) -> Outcome {
        match self {
            Player::First => Outcome::FirstPlayerWin,
            Player::Second => Outcome::SecondPlayerWin,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "P1"),
            Player::Second => write!(f, "P2"),
        }
    }
}

/// Terminal result of a finished game.
///
/// The outcome space is closed and known at design time, so this is a fixed
/// enum rather than an open-ended tally key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    FirstPlayerWin,
    SecondPlayerWin,
    Draw,
}

impl Outcome {
    /// The winning player, or `None` for a draw.
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::FirstPlayerWin => Some(Player::First),
            Outcome::SecondPlayerWin => Some(Player::Second),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::FirstPlayerWin => write!(f, "first player wins"),
            Outcome::SecondPlayerWin => write!(f, "second player wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// An immutable game position: board contents plus whose turn it is to move.
///
/// Implementations must uphold:
/// - `legal_moves()` is empty iff `is_terminal()` is true
/// - `result()` is `Some` iff `is_terminal()` is true
/// - `apply` is pure: it returns a new state with the move applied and the
///   turn flipped, and never mutates the receiver
/// - `apply` is only ever called with moves drawn from `legal_moves()` of the
///   same state; behavior for other moves is unspecified
pub trait GameState: Clone {
    /// A move in this game. Cheap to copy; compared and printed by the engine
    /// when extracting and rendering results.
    type Move: Copy + Eq + fmt::Debug;

    /// The player about to move in this position.
    fn to_move(&self) -> Player;

    /// All legal moves from this position. Empty iff the position is terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Whether the game is over in this position.
    fn is_terminal(&self) -> bool;

    /// The terminal outcome, defined only when `is_terminal()`.
    fn result(&self) -> Option<Outcome>;

    /// Apply a legal move, returning the successor position.
    fn apply(&self, mv: Self::Move) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent(), Player::First);
        assert_eq!(Player::First.opponent().opponent(), Player::First);
    }

    #[test]
    fn test_wins_round_trip() {
        assert_eq!(Player::First.wins().winner(), Some(Player::First));
        assert_eq!(Player::Second.wins().winner(), Some(Player::Second));
    }

    #[test]
    fn test_draw_has_no_winner() {
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Player::First.to_string(), "P1");
        assert_eq!(Outcome::Draw.to_string(), "draw");
        assert_eq!(Outcome::FirstPlayerWin.to_string(), "first player wins");
    }
}
