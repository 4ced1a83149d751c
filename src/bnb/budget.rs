//! Node and wall-clock budgets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::SolverConfig;

/// What the search should do after a budget check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    Continue,
    Terminate(String),
}

/// Limits shared by every search running for one solve.
///
/// The node counter is shared, so in parallel mode the limit applies to the
/// total over all workers.
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget<'a> {
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    nodes: &'a AtomicU64,
}

impl<'a> SearchBudget<'a> {
    pub fn new(config: &SolverConfig, started: Instant, nodes: &'a AtomicU64) -> Self {
        Self {
            node_limit: config.node_limit,
            deadline: config.time_limit().map(|limit| started + limit),
            nodes,
        }
    }

    /// Counts one node and checks both limits.
    pub fn check(&self) -> SearchCommand {
        let visited = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(limit) = self.node_limit {
            if visited > limit {
                return SearchCommand::Terminate(format!("node limit {limit} reached"));
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return SearchCommand::Terminate("time limit reached".to_string());
            }
        }
        SearchCommand::Continue
    }

    /// Total nodes counted so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited() {
        let nodes = AtomicU64::new(0);
        let budget = SearchBudget::new(&SolverConfig::default(), Instant::now(), &nodes);
        for _ in 0..1000 {
            assert_eq!(budget.check(), SearchCommand::Continue);
        }
        assert_eq!(budget.nodes(), 1000);
        assert_eq!(budget.remaining(), None);
    }

    #[test]
    fn test_node_limit() {
        let nodes = AtomicU64::new(0);
        let config = SolverConfig::default().with_node_limit(2);
        let budget = SearchBudget::new(&config, Instant::now(), &nodes);

        assert_eq!(budget.check(), SearchCommand::Continue);
        assert_eq!(budget.check(), SearchCommand::Continue);
        assert!(matches!(budget.check(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_zero_node_limit_stops_immediately() {
        let nodes = AtomicU64::new(0);
        let config = SolverConfig::default().with_node_limit(0);
        let budget = SearchBudget::new(&config, Instant::now(), &nodes);
        assert!(matches!(budget.check(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_expired_deadline() {
        let nodes = AtomicU64::new(0);
        let config = SolverConfig::default().with_time_limit_ms(0);
        let budget = SearchBudget::new(&config, Instant::now(), &nodes);
        assert_eq!(
            budget.check(),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn test_shared_counter() {
        let nodes = AtomicU64::new(0);
        let config = SolverConfig::default().with_node_limit(3);
        let a = SearchBudget::new(&config, Instant::now(), &nodes);
        let b = SearchBudget::new(&config, Instant::now(), &nodes);

        assert_eq!(a.check(), SearchCommand::Continue);
        assert_eq!(b.check(), SearchCommand::Continue);
        assert_eq!(a.check(), SearchCommand::Continue);
        assert!(matches!(b.check(), SearchCommand::Terminate(_)));
    }
}
