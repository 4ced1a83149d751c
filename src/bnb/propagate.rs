//! Time-window propagation over the disjunctive graph.
//!
//! Each task carries a window `[earliest_start, latest_start]`. Arcs come from
//! job chains (static) and from decided tool orderings (added by the search).
//! After every new arc the windows are tightened to a fixpoint:
//!
//! - **Forward**: `est(succ) ≥ est(pred) + dur(pred)` along every arc.
//! - **Backward**: `lst(pred) ≤ lst(succ) − dur(pred)` along every arc.
//!
//! Earliest starts depend only on earliest starts and latest starts only on
//! latest starts, so the two directions run as independent worklists. A
//! window with `est > lst`, or an earliest end beyond the current end limit,
//! is a conflict: the branch is infeasible and must be undone by the caller.
//!
//! All changes are written to a [`Trail`] so [`Propagator::backtrack`]
//! restores the previous decision level exactly.
//!
//! # Reference
//! Baptiste, Le Pape & Nuijten (2001), "Constraint-Based Scheduling", Ch. 2

use super::trail::{Trail, TrailEntry};
use crate::shop::ShopModel;

/// Start-time window of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Earliest feasible start.
    pub earliest_start: i64,
    /// Latest feasible start.
    pub latest_start: i64,
}

impl Window {
    #[inline]
    pub fn new(earliest_start: i64, latest_start: i64) -> Self {
        Self {
            earliest_start,
            latest_start,
        }
    }

    /// Whether no start time remains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.earliest_start > self.latest_start
    }

    /// Whether the window admits exactly one start time.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.earliest_start == self.latest_start
    }
}

/// Propagation failure: the window of `task` became empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub task: usize,
}

/// Window store plus decided arcs, with trail-based undo.
#[derive(Debug, Clone)]
pub struct Propagator<'m> {
    model: &'m ShopModel,
    windows: Vec<Window>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    trail: Trail,
    forward: Vec<usize>,
    backward: Vec<usize>,
    end_limit: i64,
}

impl<'m> Propagator<'m> {
    /// Initializes windows to `[0, horizon − duration]` and runs the forward
    /// and backward chain passes.
    pub fn new(model: &'m ShopModel) -> Result<Self, Conflict> {
        let horizon = model.horizon();
        let n = model.task_count();
        let mut propagator = Self {
            model,
            windows: model
                .tasks()
                .iter()
                .map(|t| Window::new(0, horizon - t.duration))
                .collect(),
            successors: vec![Vec::new(); n],
            predecessors: vec![Vec::new(); n],
            trail: Trail::new(),
            forward: Vec::new(),
            backward: Vec::new(),
            end_limit: horizon,
        };
        propagator.propagate_chains()?;
        Ok(propagator)
    }

    /// Forward pass over each chain in sequence order, then backward pass in
    /// reverse order.
    fn propagate_chains(&mut self) -> Result<(), Conflict> {
        let model = self.model;
        for job in model.jobs() {
            for pair in job.tasks.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                let end = self.windows[current].earliest_start + model.duration(current);
                self.raise_earliest(next, end)?;
            }
        }
        for job in model.jobs() {
            for pair in job.tasks.windows(2).rev() {
                let (current, next) = (pair[0], pair[1]);
                let latest = self.windows[next].latest_start - model.duration(current);
                self.lower_latest(current, latest)?;
            }
        }
        self.forward.clear();
        self.backward.clear();
        Ok(())
    }

    /// Current windows, indexed by task.
    #[inline]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[inline]
    pub fn window(&self, task: usize) -> Window {
        self.windows[task]
    }

    /// Earliest starts of all tasks.
    pub fn earliest_starts(&self) -> Vec<i64> {
        self.windows.iter().map(|w| w.earliest_start).collect()
    }

    /// Latest admissible end time of any task.
    #[inline]
    pub fn end_limit(&self) -> i64 {
        self.end_limit
    }

    /// Tightens the end limit. Never loosens it.
    ///
    /// The limit is not trailed: it only tracks the incumbent, which never
    /// gets worse during a search.
    #[inline]
    pub fn set_end_limit(&mut self, limit: i64) {
        self.end_limit = self.end_limit.min(limit);
    }

    /// Number of open decision levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.trail.depth()
    }

    /// Opens a decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.trail.push_frame();
    }

    /// Undoes every change since the newest [`Propagator::push_frame`].
    pub fn backtrack(&mut self) {
        for entry in self.trail.pop_frame() {
            match entry {
                TrailEntry::EarliestStart { task, previous } => {
                    self.windows[task].earliest_start = previous;
                }
                TrailEntry::LatestStart { task, previous } => {
                    self.windows[task].latest_start = previous;
                }
                TrailEntry::Arc { from, to } => {
                    let popped_to = self.successors[from].pop();
                    let popped_from = self.predecessors[to].pop();
                    debug_assert_eq!(popped_to, Some(to));
                    debug_assert_eq!(popped_from, Some(from));
                }
            }
        }
    }

    /// Orders two tasks on one tool: `before` ends no later than `after` starts.
    ///
    /// On `Err` the windows are left partially updated; the caller must
    /// [`Propagator::backtrack`] the current frame.
    pub fn order(&mut self, before: usize, after: usize) -> Result<(), Conflict> {
        let result = self.apply_order(before, after);
        if result.is_err() {
            self.forward.clear();
            self.backward.clear();
        }
        result
    }

    fn apply_order(&mut self, before: usize, after: usize) -> Result<(), Conflict> {
        self.successors[before].push(after);
        self.predecessors[after].push(before);
        self.record(TrailEntry::Arc {
            from: before,
            to: after,
        });

        let duration = self.model.duration(before);
        let earliest = self.windows[before].earliest_start + duration;
        self.raise_earliest(after, earliest)?;
        let latest = self.windows[after].latest_start - duration;
        self.lower_latest(before, latest)?;

        self.fixpoint()
    }

    fn fixpoint(&mut self) -> Result<(), Conflict> {
        let model = self.model;

        while let Some(task) = self.forward.pop() {
            let end = self.windows[task].earliest_start + model.duration(task);
            if let Some(next) = model.job_successor(task) {
                self.raise_earliest(next, end)?;
            }
            for k in 0..self.successors[task].len() {
                let next = self.successors[task][k];
                self.raise_earliest(next, end)?;
            }
        }

        while let Some(task) = self.backward.pop() {
            let latest = self.windows[task].latest_start;
            if let Some(prev) = model.job_predecessor(task) {
                self.lower_latest(prev, latest - model.duration(prev))?;
            }
            for k in 0..self.predecessors[task].len() {
                let prev = self.predecessors[task][k];
                self.lower_latest(prev, latest - model.duration(prev))?;
            }
        }

        Ok(())
    }

    fn raise_earliest(&mut self, task: usize, value: i64) -> Result<(), Conflict> {
        let window = self.windows[task];
        if value <= window.earliest_start {
            return Ok(());
        }
        self.record(TrailEntry::EarliestStart {
            task,
            previous: window.earliest_start,
        });
        self.windows[task].earliest_start = value;

        if value > window.latest_start || value + self.model.duration(task) > self.end_limit {
            return Err(Conflict { task });
        }
        self.forward.push(task);
        Ok(())
    }

    fn lower_latest(&mut self, task: usize, value: i64) -> Result<(), Conflict> {
        let window = self.windows[task];
        if value >= window.latest_start {
            return Ok(());
        }
        self.record(TrailEntry::LatestStart {
            task,
            previous: window.latest_start,
        });
        self.windows[task].latest_start = value;

        if value < window.earliest_start {
            return Err(Conflict { task });
        }
        self.backward.push(task);
        Ok(())
    }

    /// Root-level changes are permanent and need no undo entry.
    #[inline]
    fn record(&mut self, entry: TrailEntry) {
        if self.trail.depth() > 0 {
            self.trail.push(entry);
        }
    }

    /// Length of the intersection of the two tasks' possible execution spans
    /// `[est, lst + dur)`. Non-positive means the order is already implied.
    pub fn overlap(&self, a: usize, b: usize) -> i64 {
        let (wa, wb) = (self.windows[a], self.windows[b]);
        let end_a = wa.latest_start + self.model.duration(a);
        let end_b = wb.latest_start + self.model.duration(b);
        end_a.min(end_b) - wa.earliest_start.max(wb.earliest_start)
    }
}
