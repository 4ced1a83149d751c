//! Makespan lower bounds.
//!
//! # Static bound
//! Computed once from the model:
//! - job bound: sum of durations along the job's chain
//! - tool bound: sum of durations of the tool's tasks
//! - global bound: maximum of all job and tool bounds
//!
//! # Node bound
//! Recomputed at every search node from the current time windows:
//! - every task ends no earlier than `est + dur`
//! - each tool, with its tasks sequenced by earliest start, finishes no
//!   earlier than the as-soon-as-possible completion of that sequence
//!   (optimal for the single-machine relaxation with release dates)
//! - head-load-tail: for every suffix of the est-sorted tool tasks,
//!   `min est + Σ dur + min tail` (tails are the static job tails)
//!
//! # Reference
//! Carlier (1982), "The one-machine sequencing problem"

use super::propagate::Window;
use crate::shop::ShopModel;

/// Static lower bounds of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerBound {
    /// Chain length per job.
    pub jobs: Vec<i64>,
    /// Total load per tool.
    pub tools: Vec<i64>,
    /// Maximum over jobs and tools; 0 for an empty instance.
    pub global: i64,
}

impl LowerBound {
    pub fn compute(model: &ShopModel) -> Self {
        let jobs: Vec<i64> = model
            .jobs()
            .iter()
            .map(|job| job.tasks.iter().map(|&t| model.duration(t)).sum())
            .collect();
        let tools: Vec<i64> = model
            .tools()
            .iter()
            .map(|tool| tool.tasks.iter().map(|&t| model.duration(t)).sum())
            .collect();
        let global = jobs.iter().chain(tools.iter()).copied().max().unwrap_or(0);

        Self {
            jobs,
            tools,
            global,
        }
    }
}

/// Node bound evaluator with a reusable sort buffer.
#[derive(Debug, Clone, Default)]
pub struct BoundEstimator {
    scratch: Vec<usize>,
}

impl BoundEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound on the makespan of any schedule inside `windows`.
    pub fn node_bound(&mut self, model: &ShopModel, windows: &[Window]) -> i64 {
        let mut bound = windows
            .iter()
            .zip(model.tasks())
            .map(|(w, t)| w.earliest_start + t.duration)
            .max()
            .unwrap_or(0);
        for tool in 0..model.tools().len() {
            bound = bound.max(self.tool_bound(model, windows, tool));
        }
        bound
    }

    /// Lower bound contributed by one tool.
    pub fn tool_bound(&mut self, model: &ShopModel, windows: &[Window], tool: usize) -> i64 {
        self.scratch.clear();
        self.scratch.extend_from_slice(&model.tools()[tool].tasks);
        if self.scratch.is_empty() {
            return 0;
        }
        self.scratch
            .sort_unstable_by_key(|&t| (windows[t].earliest_start, t));

        let mut completion = 0;
        for &t in &self.scratch {
            completion = completion.max(windows[t].earliest_start) + model.duration(t);
        }

        let mut bound = completion;
        let mut load = 0;
        let mut min_tail = i64::MAX;
        for &t in self.scratch.iter().rev() {
            load += model.duration(t);
            min_tail = min_tail.min(model.task(t).tail);
            bound = bound.max(windows[t].earliest_start + load + min_tail);
        }
        bound
    }
}
