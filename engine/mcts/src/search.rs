//! Time-boxed Monte-Carlo tree search.
//!
//! One iteration runs the four classic phases against the shared board and
//! the persistent tree:
//!
//! 1. **Selection**: descend from the root by UCT score, applying each
//!    chosen child's mark to the board, until a terminal position or a
//!    childless node.
//! 2. **Expansion**: a childless node below the visit threshold gets one
//!    cheap playout; at the threshold (or on the root's first visit) it is
//!    expanded into one child per legal square, each seeded with its own
//!    playout.
//! 3. **Simulation**: uniformly random legal moves for alternating sides
//!    until three-in-a-row or a full board, with every applied mark undone
//!    before the playout returns.
//! 4. **Back-propagation**: visit and credit totals walk back to the root,
//!    undoing the selection marks on the way up.
//!
//! The board is borrowed for the duration of one `search` call and is
//! returned bit-identical: every mark made during an iteration is paired
//! with an undo before the iteration ends.

use std::time::{Duration, Instant};

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use tictactoe::{squares, Alliance, Board, BOARD_LEN};

use crate::config::{Budget, SearchConfig};
use crate::node::NodeId;
use crate::tree::SearchTree;

/// Result of a search call.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Chosen square, the root child with the highest mean value.
    pub square: u8,

    /// Mean value of the chosen child.
    pub value: f32,

    /// Iterations completed within the budget.
    pub iterations: u64,

    /// Wall-clock time actually spent.
    pub elapsed: Duration,
}

/// Outcome of one iteration: a visit delta plus the credit earned by each
/// side, to be added to every ancestor's statistics on the way back up.
#[derive(Debug, Clone, Copy, Default)]
struct Outcome {
    visits: u32,
    credit_x: f32,
    credit_o: f32,
}

impl Outcome {
    fn credit(&self, owner: Alliance) -> f32 {
        match owner {
            Alliance::X => self.credit_x,
            Alliance::O => self.credit_o,
        }
    }

    fn win(winner: Alliance, credit: f32) -> Self {
        match winner {
            Alliance::X => Self { visits: 1, credit_x: credit, credit_o: 0.0 },
            Alliance::O => Self { visits: 1, credit_x: 0.0, credit_o: credit },
        }
    }

    fn draw() -> Self {
        Self { visits: 1, credit_x: 0.5, credit_o: 0.5 }
    }
}

/// Full win/draw outcome for the position on `board`, if it is terminal.
fn terminal_outcome(board: &Board) -> Option<Outcome> {
    if board.has_victory(Alliance::X) {
        Some(Outcome::win(Alliance::X, 1.0))
    } else if board.has_victory(Alliance::O) {
        Some(Outcome::win(Alliance::O, 1.0))
    } else if board.is_full() {
        Some(Outcome::draw())
    } else {
        None
    }
}

/// Monte-Carlo tree searcher.
pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    /// Create a searcher with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run iterations against `board` and `tree` until the wall-clock
    /// budget elapses, then return the root child with the highest mean
    /// value.
    ///
    /// The board must have at least one legal move; calling on a terminal
    /// position is a caller bug and asserts. The tree root must represent
    /// the current board position, with the side to move being the
    /// complement of the root's owner. On return the board is bit-identical
    /// to its state at entry; the tree keeps everything learned.
    pub fn search(
        &self,
        board: &mut Board,
        tree: &mut SearchTree,
        budget: Budget,
        rng: &mut ChaCha20Rng,
    ) -> SearchReport {
        assert!(
            board.legal_moves() != 0,
            "search called on a position with no legal moves"
        );

        let started = Instant::now();
        let deadline = started + self.config.budget(budget);
        let mut iterations = 0u64;
        loop {
            self.simulate(board, tree, rng);
            iterations += 1;
            // The deadline is only observed between iterations; a single
            // iteration is at most one expansion plus nine playouts.
            if Instant::now() >= deadline {
                break;
            }
        }

        let (square, value) = tree
            .best_move()
            .expect("root is expanded after at least one iteration");
        let elapsed = started.elapsed();
        debug!(
            square,
            value,
            iterations,
            nodes = tree.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "search complete"
        );
        trace!(stats = ?tree.stats(), "tree after search");
        SearchReport { square, value, iterations, elapsed }
    }

    /// One full selection / expansion / simulation / back-propagation pass.
    fn simulate(&self, board: &mut Board, tree: &mut SearchTree, rng: &mut ChaCha20Rng) {
        let root = tree.root();
        let mut current = root;

        // Selection: descend by UCT while children exist, marking each
        // chosen move on the shared board.
        let outcome = loop {
            if let Some(outcome) = terminal_outcome(board) {
                // A decided position needs no playout; credit it at full
                // strength and nudge the search toward or away from it.
                break outcome;
            }
            if tree.get(current).is_leaf() {
                break self.rollout(board, tree, current, rng, current == root);
            }
            let child = tree
                .select_child(current, self.config.exploration)
                .expect("non-leaf node has children");
            let node = tree.get(child);
            board.mark(node.owner, node.mv);
            current = child;
        };

        // Back-propagation: every node on the selection path absorbs the
        // iteration's totals, crediting its own side, and its mark is
        // undone so the board ends where it started. The root is updated
        // once and has no mark of its own to undo.
        let mut id = current;
        loop {
            let node = tree.get_mut(id);
            node.visits += outcome.visits;
            node.value += outcome.credit(node.owner);
            if node.parent.is_none() {
                break;
            }
            board.mark(node.owner, node.mv);
            id = node.parent;
        }
    }

    /// Expansion policy for a childless node.
    ///
    /// Below the visit threshold the node is not yet worth a child set:
    /// run one cheap playout and return its outcome. At the threshold, or
    /// on the root's forced first expansion, create one child per legal
    /// square and seed each with a single playout of its own.
    fn rollout(
        &self,
        board: &mut Board,
        tree: &mut SearchTree,
        leaf: NodeId,
        rng: &mut ChaCha20Rng,
        init: bool,
    ) -> Outcome {
        let node = tree.get(leaf);
        let owner = node.owner;

        if !init && node.visits < self.config.expansion_threshold {
            return self.playout(board, !owner, rng);
        }

        let mover = !owner;
        let mut totals = Outcome::default();
        for square in squares(board.legal_moves()) {
            let child = tree.add_child(leaf, square);
            board.mark(mover, square);
            // After the child's mark the original owner is on the move
            // again.
            let sample = self.playout(board, owner, rng);
            let child_node = tree.get_mut(child);
            child_node.visits = sample.visits;
            child_node.value += sample.credit(mover);
            totals.visits += sample.visits;
            totals.credit_x += sample.credit_x;
            totals.credit_o += sample.credit_o;
            board.mark(mover, square);
        }
        totals
    }

    /// Random playout from the current position, `to_move` first.
    ///
    /// Plays uniformly random legal moves on the shared board, recording
    /// each on a stack, then unwinds the stack so the board is exactly as
    /// it was on entry. The winner's credit shrinks by the earliness
    /// discount per ply played, so quicker wins score higher; a draw is
    /// worth 0.5 to both sides.
    fn playout(&self, board: &mut Board, to_move: Alliance, rng: &mut ChaCha20Rng) -> Outcome {
        let mut side = to_move;
        let mut applied = [0u8; BOARD_LEN as usize];
        let mut plies = 0usize;

        let winner = loop {
            if board.has_victory(Alliance::X) {
                break Some(Alliance::X);
            }
            if board.has_victory(Alliance::O) {
                break Some(Alliance::O);
            }
            if board.is_full() {
                break None;
            }
            let legal = board.legal_moves();
            let pick = rng.gen_range(0..legal.count_ones());
            let square = squares(legal)
                .nth(pick as usize)
                .expect("pick is below the legal-move count");
            board.mark(side, square);
            applied[plies] = square;
            plies += 1;
            side = !side;
        };

        let outcome = match winner {
            Some(winner) => {
                let credit =
                    (1.0 - self.config.earliness_discount * plies as f32).max(0.0);
                Outcome::win(winner, credit)
            }
            None => Outcome::draw(),
        };

        // Unwind in reverse order, flipping back through the sides that
        // played each mark.
        for &square in applied[..plies].iter().rev() {
            side = !side;
            board.mark(side, square);
        }

        outcome
    }
}
