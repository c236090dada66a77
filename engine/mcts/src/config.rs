//! Search configuration parameters.

use std::time::Duration;

/// Which wall-clock budget tier a search call runs under.
///
/// `Fast` is meant for a fresh per-move root with no accumulated statistics;
/// `Slow` for a persisted tree carried across plies, where the extra time
/// deepens an already-informed subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Fast,
    Slow,
}

/// Configuration for Monte-Carlo tree search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Exploration constant for the UCT formula.
    /// Higher values favour exploration, lower values exploitation.
    pub exploration: f32,

    /// Visits a leaf must accumulate before it is expanded into a full
    /// child set. Below the threshold, single cheap playouts gather early
    /// statistics without paying for child allocation.
    pub expansion_threshold: u32,

    /// Win-credit reduction per playout ply, so faster wins score higher.
    /// A playout is at most nine plies, so the discounted credit stays
    /// well above the 0.5 awarded for a draw.
    pub earliness_discount: f32,

    /// Wall-clock budget for a search from a fresh per-move root.
    pub fast_budget: Duration,

    /// Wall-clock budget when reusing a persisted tree.
    pub slow_budget: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: 1.42,
            expansion_threshold: 30,
            earliness_discount: 0.01,
            fast_budget: Duration::from_millis(100),
            slow_budget: Duration::from_millis(500),
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            fast_budget: Duration::from_millis(10),
            slow_budget: Duration::from_millis(25),
            ..Self::default()
        }
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f32) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the expansion threshold.
    pub fn with_expansion_threshold(mut self, visits: u32) -> Self {
        self.expansion_threshold = visits;
        self
    }

    /// Builder pattern: set both budget tiers.
    pub fn with_budgets(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast_budget = fast;
        self.slow_budget = slow;
        self
    }

    /// The wall-clock allowance for `budget`.
    pub fn budget(&self, budget: Budget) -> Duration {
        match budget {
            Budget::Fast => self.fast_budget,
            Budget::Slow => self.slow_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();
        assert!((config.exploration - 1.42).abs() < 1e-6);
        assert_eq!(config.expansion_threshold, 30);
        assert!(config.fast_budget < config.slow_budget);
    }

    #[test]
    fn builder_pattern() {
        let config = SearchConfig::default()
            .with_exploration(2.0)
            .with_expansion_threshold(5)
            .with_budgets(Duration::from_millis(1), Duration::from_millis(2));

        assert!((config.exploration - 2.0).abs() < 1e-6);
        assert_eq!(config.expansion_threshold, 5);
        assert_eq!(config.budget(Budget::Fast), Duration::from_millis(1));
        assert_eq!(config.budget(Budget::Slow), Duration::from_millis(2));
    }

    #[test]
    fn discounted_win_outweighs_draw() {
        let config = SearchConfig::default();
        let worst_win = 1.0 - config.earliness_discount * 9.0;
        assert!(worst_win > 0.5);
    }
}
