//! Search tree node representation.
//!
//! Each node represents a board position reached from its parent by exactly
//! one move. Nodes store the visit and value statistics used for UCT
//! selection and for the final move choice.

use tictactoe::Alliance;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A statistics node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (`NONE` for the root).
    pub parent: NodeId,

    /// Square whose mark produced this position. Meaningless for the root,
    /// which is identified by `parent == NodeId::NONE` and never addressed
    /// by move.
    pub mv: u8,

    /// The side that just moved into this position; its statistics are
    /// credited from this side's perspective.
    pub owner: Alliance,

    /// Number of playouts recorded through this node.
    pub visits: u32,

    /// Accumulated outcome credit for `owner`, in [0, 1] per unit visit.
    pub value: f32,

    /// Children as `(square, id)` pairs, in discovery order.
    /// Empty until the node is expanded.
    pub children: Vec<(u8, NodeId)>,
}

impl SearchNode {
    /// Create a root node for a position where `owner` has just moved.
    pub fn new_root(owner: Alliance) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: 0,
            owner,
            visits: 0,
            value: 0.0,
            children: Vec::new(),
        }
    }

    /// Create a child reached from `parent` by `owner` marking `mv`.
    pub fn new_child(parent: NodeId, mv: u8, owner: Alliance) -> Self {
        Self {
            parent,
            mv,
            owner,
            visits: 0,
            value: 0.0,
            children: Vec::new(),
        }
    }

    /// Mean credit per visit. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f32
        }
    }

    /// UCT score for child selection under a parent with `ln(n)` visits.
    ///
    /// `score = v/ni + c * sqrt(ln(n)/ni)`. An unvisited child scores
    /// positive infinity so every child is tried before any repeat.
    ///
    /// Takes the pre-computed `ln` of the parent's visit count to avoid
    /// recomputing it per child during a comparison sweep.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f32, exploration: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }
        let ni = self.visits as f32;
        self.value / ni + exploration * (parent_visits_ln / ni).sqrt()
    }

    /// Whether this node has no children yet.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(NodeId(0).is_some());
        assert!(!NodeId(0).is_none());
    }

    #[test]
    fn new_root() {
        let node = SearchNode::new_root(Alliance::O);
        assert!(node.parent.is_none());
        assert_eq!(node.owner, Alliance::O);
        assert_eq!(node.visits, 0);
        assert!(node.is_leaf());
    }

    #[test]
    fn mean_value() {
        let mut node = SearchNode::new_root(Alliance::X);
        assert!(node.mean_value().abs() < 1e-6);

        node.visits = 4;
        node.value = 2.0;
        assert!((node.mean_value() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unvisited_child_scores_infinite() {
        let node = SearchNode::new_child(NodeId(0), 3, Alliance::X);
        assert_eq!(node.uct_score(100.0_f32.ln(), 1.42), f32::INFINITY);
    }

    #[test]
    fn uct_score_formula() {
        let mut node = SearchNode::new_child(NodeId(0), 3, Alliance::X);
        node.visits = 4;
        node.value = 2.0;

        // v/ni + c * sqrt(ln(n)/ni) with n = 100.
        let parent_ln = 100.0_f32.ln();
        let expected = 0.5 + 1.42 * (parent_ln / 4.0).sqrt();
        assert!((node.uct_score(parent_ln, 1.42) - expected).abs() < 1e-5);
    }
}
