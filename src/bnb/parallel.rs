//! Subtree-parallel branch-and-bound.
//!
//! The tree is first expanded on the calling thread down to a fixed decision
//! depth. The open nodes there become independent subtrees, identified by
//! their decision paths. Worker threads pull subtree indices from an atomic
//! cursor and replay each path on their own search state.
//!
//! Workers share only the node counter and the best makespan
//! ([`SharedBound`]). No window, trail or incumbent schedule is shared.
//!
//! When workers report schedules of equal makespan, the one from the lowest
//! subtree index wins; the splitter's own schedules (warm start, shallow
//! leaves) rank before all subtrees. The makespan of a completed search does
//! not depend on thread timing; which optimal schedule is returned may.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use super::budget::{SearchBudget, SearchCommand};
use super::incumbent::{Candidate, SharedBound};
use super::search::{BnbSearch, Decision, SearchOutcome};
use super::stats::SearchStatistics;
use crate::config::SolverConfig;
use crate::shop::ShopModel;

/// A worker's result, ranked by the subtree that produced its schedule.
struct WorkerOutcome {
    best: Option<(Candidate, usize)>,
    command: SearchCommand,
    statistics: SearchStatistics,
}

/// Runs the search with `config.workers` threads.
pub fn run_parallel(
    model: &ShopModel,
    config: &SolverConfig,
    root_lower_bound: i64,
    warm_start: Option<Candidate>,
) -> SearchOutcome {
    let started = Instant::now();
    let nodes = AtomicU64::new(0);
    let shared = SharedBound::new();

    let mut splitter = match BnbSearch::new(
        model,
        root_lower_bound,
        SearchBudget::new(config, started, &nodes),
    ) {
        Ok(search) => search.with_shared(&shared),
        Err(_) => return SearchOutcome::infeasible(SearchStatistics::default()),
    };
    if let Some(candidate) = warm_start {
        splitter.seed(candidate);
    }

    let (paths, split) = splitter.split(config.split_depth);
    if !split.exhausted || paths.is_empty() {
        return split;
    }

    let workers = config.workers.max(1).min(paths.len());
    info!(
        subtrees = paths.len(),
        workers,
        depth = config.split_depth,
        "parallel search started"
    );

    let cursor = AtomicUsize::new(0);
    let outcomes: Vec<WorkerOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let (paths, cursor, shared, nodes) = (&paths, &cursor, &shared, &nodes);
                scope.spawn(move || {
                    run_worker(
                        worker,
                        model,
                        root_lower_bound,
                        SearchBudget::new(config, started, nodes),
                        shared,
                        paths,
                        cursor,
                    )
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    merge(split, outcomes, started)
}

fn run_worker<'a>(
    worker: usize,
    model: &'a ShopModel,
    root_lower_bound: i64,
    budget: SearchBudget<'a>,
    shared: &'a SharedBound,
    paths: &[Vec<Decision>],
    cursor: &AtomicUsize,
) -> WorkerOutcome {
    let started = Instant::now();
    let mut search = match BnbSearch::new(model, root_lower_bound, budget) {
        Ok(search) => search.with_shared(shared),
        Err(_) => {
            return WorkerOutcome {
                best: None,
                command: SearchCommand::Continue,
                statistics: SearchStatistics::default(),
            }
        }
    };

    let mut origin = None;
    let mut command = SearchCommand::Continue;
    let mut subtrees = 0usize;
    loop {
        let index = cursor.fetch_add(1, Ordering::Relaxed);
        let Some(path) = paths.get(index) else {
            break;
        };
        subtrees += 1;

        let before = search.incumbent().makespan();
        command = search.explore_subtree(path);
        if search.incumbent().makespan() != before {
            origin = Some(index);
        }
        if let SearchCommand::Terminate(_) = command {
            break;
        }
    }
    debug!(worker, subtrees, "worker finished");

    let outcome = search.finish(command.clone(), started);
    WorkerOutcome {
        best: outcome.best.zip(origin),
        command,
        statistics: outcome.statistics,
    }
}

fn merge(split: SearchOutcome, outcomes: Vec<WorkerOutcome>, started: Instant) -> SearchOutcome {
    let mut statistics = split.statistics;
    let mut termination = None;

    // Rank: (makespan, origin). The splitter ranks as origin 0, subtree i as i + 1.
    let mut best: Option<(Candidate, usize)> = split.best.map(|c| (c, 0));
    for outcome in outcomes {
        statistics.merge(&outcome.statistics);
        if let SearchCommand::Terminate(reason) = outcome.command {
            termination.get_or_insert(reason);
        }
        if let Some((candidate, index)) = outcome.best {
            let rank = (candidate.makespan(), index + 1);
            let better = best
                .as_ref()
                .map_or(true, |(b, origin)| rank < (b.makespan(), *origin));
            if better {
                best = Some((candidate, index + 1));
            }
        }
    }
    statistics.time_total = started.elapsed();

    SearchOutcome {
        best: best.map(|(c, _)| c),
        exhausted: termination.is_none(),
        termination,
        statistics,
    }
}
