//! Tic-tac-toe implementation of the `game-core` contract.
//!
//! The 3x3 board is indexed 0-8, row-major:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! `Player::First` plays X and moves first. A move is the index of the square
//! to claim.

use std::fmt;

use game_core::{GameState, Outcome, Player};

/// The 8 winning lines: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A tic-tac-toe position: board contents and the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    board: [Option<Player>; 9],
    to_move: Player,
}

impl TicTacToe {
    /// The empty board with X (`Player::First`) to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            to_move: Player::First,
        }
    }

    /// Build a position directly from cell contents. Used to set up test and
    /// puzzle positions without replaying a move sequence.
    pub fn from_cells(cells: [Option<Player>; 9], to_move: Player) -> Self {
        Self {
            board: cells,
            to_move,
        }
    }

    /// The contents of a square (0-8).
    pub fn cell(&self, square: u8) -> Option<Player> {
        self.board[square as usize]
    }

    fn winner(&self) -> Option<Player> {
        for line in &LINES {
            let [a, b, c] = *line;
            if self.board[a].is_some() && self.board[a] == self.board[b] && self.board[b] == self.board[c] {
                return self.board[a];
            }
        }
        None
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(|cell| cell.is_some())
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    type Move = u8;

    fn to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self) -> Vec<u8> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..9u8)
            .filter(|&square| self.board[square as usize].is_none())
            .collect()
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    fn result(&self) -> Option<Outcome> {
        if let Some(player) = self.winner() {
            return Some(player.wins());
        }
        if self.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }

    fn apply(&self, mv: u8) -> Self {
        debug_assert!(
            self.board[mv as usize].is_none() && !self.is_terminal(),
            "apply called with illegal move {mv}"
        );
        let mut next = *self;
        next.board[mv as usize] = Some(self.to_move);
        next.to_move = self.to_move.opponent();
        next
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            for col in 0..3 {
                let symbol = match self.board[row * 3 + col] {
                    Some(Player::First) => 'X',
                    Some(Player::Second) => 'O',
                    None => ' ',
                };
                if col > 0 {
                    write!(f, "|")?;
                }
                write!(f, " {symbol} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const X: Option<Player> = Some(Player::First);
    const O: Option<Player> = Some(Player::Second);
    const E: Option<Player> = None;

    #[test]
    fn test_initial_state() {
        let state = TicTacToe::new();
        assert_eq!(state.to_move(), Player::First);
        assert!(!state.is_terminal());
        assert_eq!(state.result(), None);
        assert_eq!(state.legal_moves(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_apply_is_pure_and_flips_turn() {
        let state = TicTacToe::new();
        let next = state.apply(4);

        // Receiver untouched
        assert_eq!(state, TicTacToe::new());

        assert_eq!(next.cell(4), X);
        assert_eq!(next.to_move(), Player::Second);
        assert_eq!(next.legal_moves().len(), 8);
        assert!(!next.legal_moves().contains(&4));
    }

    #[test]
    fn test_all_winning_lines() {
        for line in &LINES {
            for player in [Player::First, Player::Second] {
                let mut cells = [E; 9];
                for &square in line {
                    cells[square] = Some(player);
                }
                let state = TicTacToe::from_cells(cells, player.opponent());
                assert!(state.is_terminal(), "line {line:?} should end the game");
                assert_eq!(
                    state.result(),
                    Some(player.wins()),
                    "line {line:?} should win for {player}"
                );
                assert!(state.legal_moves().is_empty());
            }
        }
    }

    #[test]
    fn test_draw_detection() {
        // X O X / X O O / O X X and two more known draw boards
        let draws = [
            [X, O, X, X, O, O, O, X, X],
            [X, O, X, O, X, X, O, X, O],
            [O, X, O, O, X, X, X, O, O],
        ];
        for cells in draws {
            let state = TicTacToe::from_cells(cells, Player::First);
            assert!(state.is_terminal(), "full board should be terminal: {cells:?}");
            assert_eq!(state.result(), Some(Outcome::Draw), "board {cells:?}");
            assert!(state.legal_moves().is_empty());
        }
    }

    #[test]
    fn test_x_wins_top_row() {
        let mut state = TicTacToe::new();
        for mv in [0, 3, 1, 4, 2] {
            state = state.apply(mv);
        }
        assert_eq!(state.result(), Some(Outcome::FirstPlayerWin));
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_mid_game_has_no_result() {
        let state = TicTacToe::new().apply(0).apply(4);
        assert!(!state.is_terminal());
        assert_eq!(state.result(), None);
        assert_eq!(state.legal_moves().len(), 7);
    }

    #[test]
    fn test_display_renders_pieces() {
        let state = TicTacToe::new().apply(0).apply(4);
        let rendered = state.to_string();
        assert!(rendered.contains('X'));
        assert!(rendered.contains('O'));
        assert!(rendered.contains("---+---+---"));
    }

    /// Random playouts uphold the contract invariants at every step.
    #[test]
    fn test_random_playout_invariants() {
        for seed in 0..50 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut state = TicTacToe::new();
            let mut plies = 0;

            while !state.is_terminal() {
                assert_eq!(state.result(), None, "seed {seed}");
                let moves = state.legal_moves();
                assert!(!moves.is_empty(), "non-terminal state must have moves (seed {seed})");

                let prev = state.to_move();
                state = state.apply(moves[rng.gen_range(0..moves.len())]);
                assert_eq!(state.to_move(), prev.opponent(), "seed {seed}");

                plies += 1;
                assert!(plies <= 9, "game must end within 9 plies (seed {seed})");
            }

            assert!(state.result().is_some(), "terminal state must have a result (seed {seed})");
            assert!(state.legal_moves().is_empty(), "seed {seed}");
        }
    }
}
