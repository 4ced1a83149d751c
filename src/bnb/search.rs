//! Depth-first branch-and-bound over disjunction orientations.
//!
//! Each node fixes the order of one unresolved tool pair. The two children
//! are explored in a fixed order (first task of the pair before the second,
//! then the reverse), so a single-threaded search is deterministic.
//!
//! At every node:
//! 1. count the node against the budget; stop on `Terminate`
//! 2. compute the node bound; prune if it cannot beat the incumbent
//! 3. pick the branching pair: tool with least slack, then the pair with
//!    the widest window overlap; no pair left means a leaf
//! 4. at a leaf, every task starts at its earliest start
//!
//! The incumbent's makespan also caps every task's earliest end through the
//! propagator's end limit, so children that cannot improve fail during
//! propagation instead of at the next bound check.

use std::time::Instant;

use tracing::{debug, trace};

use super::bounds::BoundEstimator;
use super::budget::{SearchBudget, SearchCommand};
use super::incumbent::{Candidate, Incumbent, SharedBound};
use super::propagate::{Conflict, Propagator};
use super::stats::SearchStatistics;
use crate::models::SolveStatus;
use crate::shop::ShopModel;

/// One branching decision: which disjunction, and which way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decision {
    /// Index into [`ShopModel::disjunctions`].
    pub disjunction: usize,
    /// `false`: `first` before `second`. `true`: the reverse.
    pub reversed: bool,
}

impl Decision {
    /// The `(before, after)` task pair this decision orders.
    pub fn arc(&self, model: &ShopModel) -> (usize, usize) {
        let d = model.disjunctions()[self.disjunction];
        if self.reversed {
            (d.second, d.first)
        } else {
            (d.first, d.second)
        }
    }
}

/// Result of a (sub)tree search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best schedule found, including a seeded warm start.
    pub best: Option<Candidate>,
    /// Whether the tree was fully explored.
    pub exhausted: bool,
    /// Why the search stopped early, if it did.
    pub termination: Option<String>,
    pub statistics: SearchStatistics,
}

impl SearchOutcome {
    /// Outcome for a model whose root propagation already fails.
    pub fn infeasible(statistics: SearchStatistics) -> Self {
        Self {
            best: None,
            exhausted: true,
            termination: None,
            statistics,
        }
    }

    /// Classifies the outcome.
    ///
    /// An exhausted tree proves the incumbent optimal (or the instance
    /// infeasible). A search stopped by its budget is still optimal when the
    /// incumbent meets `root_lower_bound`.
    pub fn status(&self, root_lower_bound: i64) -> SolveStatus {
        match (&self.best, self.exhausted) {
            (Some(_), true) => SolveStatus::Optimal,
            (Some(best), false) if best.makespan() <= root_lower_bound => SolveStatus::Optimal,
            (Some(_), false) => SolveStatus::Feasible,
            (None, true) => SolveStatus::Infeasible,
            (None, false) => SolveStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
struct Frontier {
    depth: usize,
    paths: Vec<Vec<Decision>>,
}

/// Branch-and-bound search state for one thread.
pub struct BnbSearch<'a> {
    model: &'a ShopModel,
    propagator: Propagator<'a>,
    estimator: BoundEstimator,
    decided: Vec<bool>,
    path: Vec<Decision>,
    incumbent: Incumbent,
    shared: Option<&'a SharedBound>,
    budget: SearchBudget<'a>,
    stats: SearchStatistics,
    frontier: Option<Frontier>,
}

impl<'a> BnbSearch<'a> {
    /// Creates a search at the root. Fails if the root windows are empty.
    pub fn new(
        model: &'a ShopModel,
        root_lower_bound: i64,
        budget: SearchBudget<'a>,
    ) -> Result<Self, Conflict> {
        let propagator = Propagator::new(model)?;
        let stats = SearchStatistics {
            root_lower_bound,
            ..SearchStatistics::default()
        };
        Ok(Self {
            model,
            propagator,
            estimator: BoundEstimator::new(),
            decided: vec![false; model.disjunctions().len()],
            path: Vec::new(),
            incumbent: Incumbent::new(),
            shared: None,
            budget,
            stats,
            frontier: None,
        })
    }

    /// Shares the incumbent makespan with other workers.
    pub fn with_shared(mut self, shared: &'a SharedBound) -> Self {
        self.shared = Some(shared);
        self
    }

    /// Installs a known schedule (e.g. a warm start) as the incumbent.
    pub fn seed(&mut self, candidate: Candidate) {
        let makespan = candidate.makespan();
        if self.incumbent.try_install(candidate) {
            self.publish(makespan);
        }
    }

    /// Makespan a new schedule has to beat.
    pub fn upper_bound(&self) -> i64 {
        let local = self.incumbent.upper_bound();
        match self.shared {
            Some(shared) => local.min(shared.get()),
            None => local,
        }
    }

    #[inline]
    pub fn incumbent(&self) -> &Incumbent {
        &self.incumbent
    }

    /// Explores the whole tree.
    pub fn run(mut self) -> SearchOutcome {
        let started = Instant::now();
        let command = self.explore(0);
        self.finish(command, started)
    }

    /// Explores the tree down to `depth` decisions and returns the paths to
    /// the open nodes there, in depth-first order, instead of exploring them.
    ///
    /// Leaves above the split depth are still evaluated and may improve the
    /// incumbent in the returned outcome.
    pub fn split(mut self, depth: usize) -> (Vec<Vec<Decision>>, SearchOutcome) {
        self.frontier = Some(Frontier {
            depth,
            paths: Vec::new(),
        });
        let started = Instant::now();
        let command = self.explore(0);
        let paths = self.frontier.take().map(|f| f.paths).unwrap_or_default();
        (paths, self.finish(command, started))
    }

    /// Replays `path` from the root and explores the subtree below it. The
    /// search is back at the root afterwards.
    pub fn explore_subtree(&mut self, path: &[Decision]) -> SearchCommand {
        let mut applied = 0;
        let mut feasible = true;
        for &decision in path {
            applied += 1;
            if self.apply(decision).is_err() {
                self.stats.on_pruning_infeasible();
                feasible = false;
                break;
            }
        }

        let command = if feasible {
            self.explore(path.len())
        } else {
            SearchCommand::Continue
        };

        for _ in 0..applied {
            self.undo();
        }
        command
    }

    /// Converts the finished search into an outcome.
    pub fn finish(mut self, command: SearchCommand, started: Instant) -> SearchOutcome {
        self.stats.time_total = started.elapsed();
        let (exhausted, termination) = match command {
            SearchCommand::Continue => (true, None),
            SearchCommand::Terminate(reason) => (false, Some(reason)),
        };
        SearchOutcome {
            best: self.incumbent.into_best(),
            exhausted,
            termination,
            statistics: self.stats,
        }
    }

    fn explore(&mut self, depth: usize) -> SearchCommand {
        self.stats.on_node_explored();
        self.stats.on_depth(depth);

        if let SearchCommand::Terminate(reason) = self.budget.check() {
            debug!(depth, reason = %reason, "search budget exhausted");
            return SearchCommand::Terminate(reason);
        }

        let best = self.upper_bound();
        let bound = self
            .estimator
            .node_bound(self.model, self.propagator.windows());
        if bound >= best {
            self.stats.on_pruning_bound();
            return SearchCommand::Continue;
        }

        let Some(k) = self.select(best) else {
            self.install_leaf();
            return SearchCommand::Continue;
        };

        if let Some(frontier) = self.frontier.as_mut() {
            if depth >= frontier.depth {
                frontier.paths.push(self.path.clone());
                return SearchCommand::Continue;
            }
        }

        for reversed in [false, true] {
            let decision = Decision {
                disjunction: k,
                reversed,
            };
            let command = match self.apply(decision) {
                Ok(()) => self.explore(depth + 1),
                Err(conflict) => {
                    trace!(task = conflict.task, depth, "branch infeasible");
                    self.stats.on_pruning_infeasible();
                    SearchCommand::Continue
                }
            };
            self.undo();
            self.stats.on_backtrack();

            if let SearchCommand::Terminate(_) = command {
                return command;
            }
        }
        SearchCommand::Continue
    }

    /// Pushes a decision level and orders the pair.
    fn apply(&mut self, decision: Decision) -> Result<(), Conflict> {
        let best = self.upper_bound();
        if best != i64::MAX {
            self.propagator.set_end_limit(best - 1);
        }
        self.propagator.push_frame();
        self.decided[decision.disjunction] = true;
        self.path.push(decision);

        let (before, after) = decision.arc(self.model);
        self.propagator.order(before, after)
    }

    /// Pops the newest decision level.
    fn undo(&mut self) {
        if let Some(decision) = self.path.pop() {
            self.decided[decision.disjunction] = false;
        }
        self.propagator.backtrack();
    }

    /// Chooses the next disjunction to branch on, or `None` if every pair is
    /// already ordered by the windows.
    fn select(&mut self, best: i64) -> Option<usize> {
        let model = self.model;
        let reference = if best == i64::MAX {
            model.horizon()
        } else {
            best
        };

        let mut chosen: Option<(i64, usize)> = None;
        for tool in 0..model.tools().len() {
            let mut pick: Option<(i64, usize)> = None;
            for k in model.tool_disjunctions(tool) {
                if self.decided[k] {
                    continue;
                }
                let d = model.disjunctions()[k];
                let overlap = self.propagator.overlap(d.first, d.second);
                if overlap <= 0 {
                    continue;
                }
                if pick.map_or(true, |(widest, _)| overlap > widest) {
                    pick = Some((overlap, k));
                }
            }

            let Some((_, k)) = pick else {
                continue;
            };
            let slack = reference
                - self
                    .estimator
                    .tool_bound(model, self.propagator.windows(), tool);
            if chosen.map_or(true, |(least, _)| slack < least) {
                chosen = Some((slack, k));
            }
        }
        chosen.map(|(_, k)| k)
    }

    fn install_leaf(&mut self) {
        let candidate = Candidate::from_starts(self.model, self.propagator.earliest_starts());
        let makespan = candidate.makespan();
        if self.incumbent.try_install(candidate) {
            self.stats.on_solution_found();
            self.publish(makespan);
            debug!(
                makespan,
                depth = self.path.len(),
                nodes = self.stats.nodes_explored,
                "improved incumbent"
            );
        }
    }

    fn publish(&mut self, makespan: i64) {
        if let Some(shared) = self.shared {
            shared.tighten(makespan);
        }
        self.propagator.set_end_limit(makespan - 1);
    }
}
