//! Monte-Carlo tree search engine for bitboard tic-tac-toe.
//!
//! The driver owns a [`tictactoe::Board`] and one [`SearchTree`] per game.
//! Each engine turn it calls [`Searcher::search`], which repeatedly runs
//! four-phase MCTS iterations (selection, expansion, simulation,
//! back-propagation) against the shared board and tree until a wall-clock
//! budget elapses, then returns the root child with the highest mean value.
//!
//! The board is mutated only transiently: every mark applied while
//! descending or playing out is undone before `search` returns. The tree is
//! mutated persistently and can be carried across plies with
//! [`SearchTree::advance`], which re-roots at the played move and prunes
//! every other branch.
//!
//! # Usage
//!
//! ```
//! use mcts::{Budget, SearchConfig, SearchTree, Searcher};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use tictactoe::{Alliance, Board};
//!
//! let mut board = Board::new();
//! let mut tree = SearchTree::new(Alliance::O); // X to move
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let searcher = Searcher::new(SearchConfig::for_testing());
//! let report = searcher.search(&mut board, &mut tree, Budget::Fast, &mut rng);
//!
//! board.mark(Alliance::X, report.square);
//! tree.advance(report.square);
//! ```

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

pub use config::{Budget, SearchConfig};
pub use node::{NodeId, SearchNode};
pub use search::{SearchReport, Searcher};
pub use tree::{SearchTree, TreeStats};
