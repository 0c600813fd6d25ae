//! Monte Carlo Tree Search for deterministic, perfect-information, zero-sum
//! two-player games.
//!
//! The engine is generic over any game implementing the `game-core`
//! [`GameState`](game_core::GameState) contract and knows nothing about board
//! layout or rules. Each search builds a fresh tree rooted at the given
//! position and runs select -> expand -> rollout -> backpropagate iterations
//! until a simulation-count or wall-clock budget runs out, then reports the
//! root child with the most visits.
//!
//! # Usage
//!
//! ```rust
//! use mcts::{Mcts, MctsConfig};
//! use game_core::GameState;
//! use games_tictactoe::TicTacToe;
//!
//! let mut engine = Mcts::new(TicTacToe::new(), MctsConfig::simulations(500)).unwrap();
//! let mv = engine.search().unwrap();
//! assert!(TicTacToe::new().legal_moves().contains(&mv));
//!
//! println!("simulations: {}", engine.stats().simulations);
//! println!("{}", engine.render_tree(1));
//! ```
//!
//! Rollouts are uniformly random. The rollout rng is injectable through
//! [`Mcts::with_rng`] so searches can be made reproducible under a fixed seed.
//!
//! # Value convention
//!
//! Backpropagation records sign-free per-outcome counters
//! ([`OutcomeTally`]) at every node on the leaf-to-root path. Selection
//! derives the signed exploitation term lazily: a node's
//! [`mean_value`](Node::mean_value) is expressed for its own mover, and UCT
//! negates it to score the node from the selecting parent's perspective.

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

pub use config::{MctsConfig, SearchBudget, DEFAULT_EXPLORATION};
pub use node::{Node, NodeId, OutcomeTally};
pub use search::{Mcts, SearchError, SearchStats};
pub use tree::{SearchTree, TreeStats};
