//! Greedy dispatching schedule used as a warm start.
//!
//! # Algorithm
//!
//! Non-delay list scheduling over job chains:
//! 1. The candidates are the first unscheduled task of every job.
//! 2. Each candidate's start is `max(job ready, tool free)`.
//! 3. Dispatch the candidate with the earliest start; ties go to the job with
//!    the most remaining work (MWKR), then to the lower job index.
//! 4. Update the job's ready time and the tool's free time; repeat.
//!
//! The result respects every chain and never overlaps two tasks on a tool,
//! so it is always a feasible incumbent.
//!
//! # Complexity
//! O(n * j) where n=tasks, j=jobs.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use crate::bnb::Candidate;
use crate::shop::ShopModel;

/// Earliest-start dispatching with a most-work-remaining tie-break.
///
/// # Example
///
/// ```
/// use u_jobshop::models::TaskRecord;
/// use u_jobshop::scheduler::GreedyScheduler;
/// use u_jobshop::shop::ShopModel;
///
/// let model = ShopModel::build(&[
///     TaskRecord::new("J1", "A", 1, 3).with_tool("M1"),
///     TaskRecord::new("J2", "A", 1, 2).with_tool("M1"),
/// ])
/// .unwrap();
/// let schedule = GreedyScheduler::new().schedule(&model);
/// assert_eq!(schedule.makespan(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    /// Creates a new scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete schedule for the model.
    pub fn schedule(&self, model: &ShopModel) -> Candidate {
        let jobs = model.jobs();
        let mut starts = vec![0i64; model.task_count()];
        let mut next = vec![0usize; jobs.len()];
        let mut job_ready = vec![0i64; jobs.len()];
        let mut tool_free = vec![0i64; model.tools().len()];
        let mut remaining: Vec<i64> = jobs
            .iter()
            .map(|job| job.tasks.iter().map(|&t| model.duration(t)).sum())
            .collect();

        for _ in 0..model.task_count() {
            // (start, -remaining work, job)
            let mut best: Option<(i64, i64, usize)> = None;
            for (j, job) in jobs.iter().enumerate() {
                let Some(&task) = job.tasks.get(next[j]) else {
                    continue;
                };
                let free = model.task(task).tool.map_or(0, |t| tool_free[t]);
                let key = (job_ready[j].max(free), -remaining[j], j);
                if best.map_or(true, |b| key < b) {
                    best = Some(key);
                }
            }

            let Some((start, _, j)) = best else {
                break;
            };
            let task = jobs[j].tasks[next[j]];
            let end = start + model.duration(task);

            starts[task] = start;
            next[j] += 1;
            job_ready[j] = end;
            remaining[j] -= model.duration(task);
            if let Some(t) = model.task(task).tool {
                tool_free[t] = end;
            }
        }

        Candidate::from_starts(model, starts)
    }
}
