//! Solver configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search budgets and engine switches.
///
/// All fields have defaults, so partial JSON/YAML documents deserialize.
///
/// # Example
/// ```
/// use u_jobshop::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_node_limit(10_000)
///     .with_time_limit_ms(500);
/// assert_eq!(config.node_limit, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of search nodes. `None` = unlimited.
    pub node_limit: Option<u64>,
    /// Wall-clock limit in milliseconds. `None` = unlimited.
    pub time_limit_ms: Option<u64>,
    /// Seed the search with a greedy dispatching schedule.
    pub warm_start: bool,
    /// Worker threads. Values above 1 enable subtree-parallel search.
    pub workers: usize,
    /// Decision depth at which the tree is split between workers.
    pub split_depth: usize,
    /// Re-check timeline invariants before returning.
    pub check_invariants: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            time_limit_ms: None,
            warm_start: true,
            workers: 1,
            split_depth: 4,
            check_invariants: true,
        }
    }
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of explored nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Caps the wall-clock time.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enables or disables the greedy warm start.
    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    /// Sets the number of worker threads (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the split depth for parallel search.
    pub fn with_split_depth(mut self, depth: usize) -> Self {
        self.split_depth = depth;
        self
    }

    /// Enables or disables the final invariant check.
    pub fn with_invariant_check(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Time limit as a `Duration`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
