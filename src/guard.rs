//! Node-count based gate for animated viewport transitions.

use crate::error::{ViewportError, ViewportResult};

/// Decides whether a viewport transition may be animated.
///
/// Eased zoom and pan cost time proportional to the number of rendered nodes, so
/// above a fixed node count the controller switches to instantaneous transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceGuard {
    node_count_limit: usize,
}

impl PerformanceGuard {
    /// Creates a guard; the limit must be positive.
    pub fn new(node_count_limit: usize) -> ViewportResult<Self> {
        if node_count_limit == 0 {
            return Err(ViewportError::InvalidNodeCountLimit(node_count_limit));
        }
        Ok(Self { node_count_limit })
    }

    /// The configured threshold.
    pub fn node_count_limit(&self) -> usize {
        self.node_count_limit
    }

    /// `true` iff `node_count <= node_count_limit`.
    pub fn should_animate(&self, node_count: usize) -> bool {
        node_count <= self.node_count_limit
    }
}

impl Default for PerformanceGuard {
    fn default() -> Self {
        Self {
            node_count_limit: crate::constants::DEFAULT_NODE_COUNT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animates_up_to_and_including_limit() {
        let guard = PerformanceGuard::new(50).unwrap();
        for n in 0..=50 {
            assert!(guard.should_animate(n), "expected animation at {n} nodes");
        }
        assert!(guard.should_animate(50));
    }

    #[test]
    fn test_instant_above_limit() {
        let guard = PerformanceGuard::new(50).unwrap();
        for n in [51, 52, 100, 1000, usize::MAX] {
            assert!(!guard.should_animate(n), "expected no animation at {n} nodes");
        }
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(
            PerformanceGuard::new(0),
            Err(ViewportError::InvalidNodeCountLimit(0))
        ));
    }
}
