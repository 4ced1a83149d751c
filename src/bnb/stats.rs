//! Search counters.

use std::fmt;
use std::time::Duration;

/// Statistics collected during branch-and-bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Decisions undone.
    pub backtracks: u64,
    /// Deepest decision level reached.
    pub max_depth: u64,
    /// Branches abandoned because propagation emptied a window.
    pub prunings_infeasible: u64,
    /// Nodes abandoned because the bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Improving schedules installed.
    pub solutions_found: u64,
    /// Global lower bound at the root.
    pub root_lower_bound: i64,
    /// Wall-clock time spent searching.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    /// Adds another worker's counters into this one.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.backtracks = self.backtracks.saturating_add(other.backtracks);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_infeasible = self
            .prunings_infeasible
            .saturating_add(other.prunings_infeasible);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search statistics:")?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:            {}", self.backtracks)?;
        writeln!(f, "  Max depth:             {}", self.max_depth)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Root lower bound:      {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_merge() {
        let mut a = SearchStatistics::default();
        a.on_node_explored();
        a.on_node_explored();
        a.on_depth(3);
        a.on_pruning_bound();

        let mut b = SearchStatistics::default();
        b.on_node_explored();
        b.on_depth(7);
        b.on_solution_found();
        b.on_pruning_infeasible();
        b.on_backtrack();

        a.merge(&b);
        assert_eq!(a.nodes_explored, 3);
        assert_eq!(a.max_depth, 7);
        assert_eq!(a.prunings_bound, 1);
        assert_eq!(a.prunings_infeasible, 1);
        assert_eq!(a.solutions_found, 1);
        assert_eq!(a.backtracks, 1);
    }

    #[test]
    fn test_display() {
        let text = SearchStatistics::default().to_string();
        assert!(text.contains("Nodes explored:        0"));
    }
}
