//! Solver facade, greedy warm start and KPI evaluation.
//!
//! [`JobShopScheduler`] runs the whole pipeline: validation and model
//! building, static lower bound, optional greedy warm start, branch-and-bound
//! (sequential or parallel), timeline extraction and invariant check.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod greedy;
mod kpi;

pub use greedy::GreedyScheduler;
pub use kpi::ScheduleKpi;

use std::sync::atomic::AtomicU64;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::bnb::{run_parallel, BnbSearch, LowerBound, SearchBudget, SearchOutcome, SearchStatistics};
use crate::config::SolverConfig;
use crate::error::{Result, SolveError};
use crate::extract::{check_invariants, extract_timeline};
use crate::models::{SolveResult, SolveStatus, TaskRecord};
use crate::scenario::Scenario;
use crate::shop::ShopModel;

/// Exact makespan solver for job-shop instances.
///
/// # Example
///
/// ```
/// use u_jobshop::models::{SolveStatus, TaskRecord};
/// use u_jobshop::JobShopScheduler;
///
/// let tasks = vec![
///     TaskRecord::new("J1", "cut", 1, 3).with_tool("SAW"),
///     TaskRecord::new("J1", "drill", 2, 2).with_tool("DRILL"),
///     TaskRecord::new("J2", "drill", 1, 2).with_tool("DRILL"),
///     TaskRecord::new("J2", "cut", 2, 2).with_tool("SAW"),
/// ];
/// let result = JobShopScheduler::new().solve(&tasks).unwrap();
/// assert_eq!(result.status, SolveStatus::Optimal);
/// assert_eq!(result.elapsed, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobShopScheduler {
    config: SolverConfig,
}

impl JobShopScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validates the records and solves the instance.
    pub fn solve(&self, records: &[TaskRecord]) -> Result<SolveResult> {
        let model = ShopModel::build(records)?;
        self.solve_model(&model)
    }

    /// Parses a nested scenario document and solves it.
    pub fn solve_scenario_json(&self, json: &str) -> Result<SolveResult> {
        let scenario = Scenario::from_json(json)?;
        let records = scenario.to_task_records()?;
        self.solve(&records)
    }

    /// Solves an already built model.
    pub fn solve_model(&self, model: &ShopModel) -> Result<SolveResult> {
        let started = Instant::now();
        let lower = LowerBound::compute(model);
        info!(
            tasks = model.task_count(),
            jobs = model.jobs().len(),
            tools = model.tools().len(),
            disjunctions = model.disjunctions().len(),
            horizon = model.horizon(),
            lower_bound = lower.global,
            "solve started"
        );

        if model.is_empty() {
            return Ok(SolveResult {
                status: SolveStatus::Optimal,
                elapsed: 0,
                timeline: Vec::new(),
                lower_bound: 0,
                statistics: SearchStatistics::default(),
            });
        }

        let warm_start = self.config.warm_start.then(|| {
            let candidate = GreedyScheduler::new().schedule(model);
            debug!(makespan = candidate.makespan(), "greedy warm start");
            candidate
        });

        let outcome = if self.config.workers > 1 {
            run_parallel(model, &self.config, lower.global, warm_start)
        } else {
            let nodes = AtomicU64::new(0);
            let budget = SearchBudget::new(&self.config, started, &nodes);
            match BnbSearch::new(model, lower.global, budget) {
                Ok(mut search) => {
                    if let Some(candidate) = warm_start {
                        search.seed(candidate);
                    }
                    search.run()
                }
                Err(conflict) => {
                    debug!(task = conflict.task, "root propagation failed");
                    SearchOutcome::infeasible(SearchStatistics::default())
                }
            }
        };

        let status = outcome.status(lower.global);
        let (elapsed, timeline) = match &outcome.best {
            Some(best) => (best.makespan(), extract_timeline(model, best)),
            None => (0, Vec::new()),
        };

        if self.config.check_invariants && status.has_schedule() {
            let violations = check_invariants(model, &timeline, lower.global);
            if !violations.is_empty() {
                error!(count = violations.len(), "schedule failed invariant check");
                return Err(SolveError::InvariantViolation(violations));
            }
        }

        let mut statistics = outcome.statistics;
        statistics.root_lower_bound = lower.global;
        statistics.time_total = started.elapsed();

        info!(
            status = %status,
            makespan = elapsed,
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            termination = outcome.termination.as_deref().unwrap_or("exhausted"),
            "solve finished"
        );

        Ok(SolveResult {
            status,
            elapsed,
            timeline,
            lower_bound: lower.global,
            statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generator::InstanceGenerator;
    use crate::models::TimelineEntry;
    use crate::scenario::tests::BAKERY;
    use crate::testing;
    use crate::validation::ValidationErrorKind;

    fn solve(records: &[TaskRecord]) -> SolveResult {
        JobShopScheduler::new().solve(records).unwrap()
    }

    fn entry<'r>(result: &'r SolveResult, job: &str, task: &str) -> &'r TimelineEntry {
        result.entry(job, task).unwrap()
    }

    #[test]
    fn test_single_task() {
        let result = solve(&[TaskRecord::new("J1", "T1", 1, 5).with_tool("M1")]);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.elapsed, 5);
        assert_eq!(result.timeline.len(), 1);
        let e = &result.timeline[0];
        assert_eq!((e.start, e.end, e.duration), (0, 5, 5));
        assert_eq!(e.tool_id.as_deref(), Some("M1"));
    }

    #[test]
    fn test_single_toolless_task() {
        let result = solve(&[TaskRecord::new("J1", "T1", 1, 4)]);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.elapsed, 4);
        assert_eq!((result.timeline[0].start, result.timeline[0].end), (0, 4));
        assert_eq!(result.timeline[0].tool_id, None);
    }

    #[test]
    fn test_single_chain_is_its_duration_sum() {
        // Bread chain; shape and pack share a table, both proofs share the proofer
        let steps = [
            ("MIX", 2, "MIXER"),
            ("PROOF1", 6, "PROOFER"),
            ("SHAPE", 2, "TABLE"),
            ("PROOF2", 5, "PROOFER"),
            ("BAKE", 3, "OVEN"),
            ("COOL", 2, "RACK"),
            ("PACK", 1, "TABLE"),
        ];
        let records: Vec<TaskRecord> = steps
            .iter()
            .enumerate()
            .map(|(k, &(id, d, tool))| TaskRecord::new("BREAD", id, k as i64 + 1, d).with_tool(tool))
            .collect();

        let result = solve(&records);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.elapsed, 21);
        let starts: Vec<i64> = result.timeline.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 2, 8, 10, 15, 18, 20]);
    }

    #[test]
    fn test_two_jobs_share_one_tool() {
        let result = solve(&[
            TaskRecord::new("J1", "A", 1, 3).with_tool("M1"),
            TaskRecord::new("J2", "B", 1, 4).with_tool("M1"),
        ]);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.elapsed, 7);

        let (a, b) = (entry(&result, "J1", "A"), entry(&result, "J2", "B"));
        assert!(!a.overlaps(b));
        assert!(a.start == 0 || b.start == 0);
    }

    #[test]
    fn test_toolless_job_runs_alongside() {
        // J1 chain: A(3)@M1 → B(2, no tool) → C(4)@M1 ; J2: D(5)@M1
        let result = solve(&[
            TaskRecord::new("J1", "A", 1, 3).with_tool("M1"),
            TaskRecord::new("J1", "B", 2, 2),
            TaskRecord::new("J1", "C", 3, 4).with_tool("M1"),
            TaskRecord::new("J2", "D", 1, 5).with_tool("M1"),
        ]);
        assert_eq!(result.status, SolveStatus::Optimal);
        // M1 load is 12; D fills the M1 gap while B runs
        assert_eq!(result.elapsed, 12);
        assert_eq!(result.lower_bound, 12);
    }

    #[test]
    fn test_chain_and_parallel_tools() {
        // Three jobs, three tools, every tool used once per job
        let records = vec![
            TaskRecord::new("J1", "T1", 1, 3).with_tool("M1"),
            TaskRecord::new("J1", "T2", 2, 2).with_tool("M2"),
            TaskRecord::new("J1", "T3", 3, 2).with_tool("M3"),
            TaskRecord::new("J2", "T1", 1, 2).with_tool("M1"),
            TaskRecord::new("J2", "T2", 2, 1).with_tool("M3"),
            TaskRecord::new("J2", "T3", 3, 4).with_tool("M2"),
            TaskRecord::new("J3", "T1", 1, 4).with_tool("M2"),
            TaskRecord::new("J3", "T2", 2, 3).with_tool("M3"),
        ];
        let result = solve(&records);
        let model = ShopModel::build(&records).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(Some(result.elapsed), testing::brute_force_makespan(&model));
        assert!(check_invariants(&model, &result.timeline, result.lower_bound).is_empty());
    }

    #[test]
    fn test_bakery_scenario() {
        let scheduler = JobShopScheduler::new();
        let result = scheduler.solve_scenario_json(BAKERY).unwrap();

        let records = Scenario::from_json(BAKERY)
            .unwrap()
            .to_task_records()
            .unwrap();
        let model = ShopModel::build(&records).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(result.elapsed > 24);
        assert_eq!(Some(result.elapsed), testing::brute_force_makespan(&model));
        assert_eq!(result.timeline.len(), 14);

        // Output order: job order, then sequence order
        assert_eq!(result.timeline[0].task_id, "TSK_BB_MIX");
        assert_eq!(result.timeline[6].task_id, "TSK_BB_PACK");
        assert_eq!(result.timeline[7].task_id, "TSK_BW_MIX");

        for tool in ["PROOFER", "PACK_TABLE", "OVEN_DECK"] {
            let entries = result.entries_for_tool(tool);
            for pair in entries.windows(2) {
                assert!(pair[0].end <= pair[1].start, "{tool} overlaps");
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let result = solve(&[]);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.elapsed, 0);
        assert!(result.timeline.is_empty());
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let records = vec![
            TaskRecord::new("J1", "A", 1, 0).with_tool("M1"),
            TaskRecord {
                seq: None,
                ..TaskRecord::new("J1", "B", 1, 2)
            },
        ];
        let err = JobShopScheduler::new().solve(&records).unwrap_err();
        match err {
            SolveError::Validation(errors) => {
                assert!(errors.contains_kind(&ValidationErrorKind::NonPositiveDuration));
                assert!(errors.contains_kind(&ValidationErrorKind::MissingSequence));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scenario_errors() {
        let scheduler = JobShopScheduler::new();
        assert!(matches!(
            scheduler.solve_scenario_json("{ not json"),
            Err(SolveError::Scenario(_))
        ));

        let bad_seq = r#"{"scenarioJobs": [{"job": {"id": "J1", "tasks": [
            {"id": "T1", "seq": "x", "duration": 1}]}}]}"#;
        assert!(matches!(
            scheduler.solve_scenario_json(bad_seq),
            Err(SolveError::Validation(_))
        ));
    }

    #[test]
    fn test_deterministic_results() {
        let records = testing::random_records(21, 4, 4);
        let a = solve(&records);
        let b = solve(&records);
        assert_eq!(a.status, b.status);
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.statistics.nodes_explored, b.statistics.nodes_explored);
    }

    #[test]
    fn test_random_instances_match_brute_force() {
        for seed in 100..110 {
            let records = testing::random_records(seed, 3, 3);
            let model = ShopModel::build(&records).unwrap();
            let result = solve(&records);

            assert_eq!(result.status, SolveStatus::Optimal, "seed {seed}");
            assert_eq!(
                Some(result.elapsed),
                testing::brute_force_makespan(&model),
                "seed {seed}"
            );
            assert!(result.elapsed >= result.lower_bound);
        }
    }

    #[test]
    fn test_warm_start_does_not_change_optimum() {
        for seed in 0..5 {
            let records = testing::random_records(seed, 4, 3);
            let with = solve(&records);
            let without = JobShopScheduler::new()
                .with_config(SolverConfig::default().with_warm_start(false))
                .solve(&records)
                .unwrap();
            assert_eq!(with.elapsed, without.elapsed, "seed {seed}");
            assert_eq!(without.status, SolveStatus::Optimal);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..4 {
            let records = testing::random_records(seed, 5, 3);
            let single = solve(&records);
            let parallel = JobShopScheduler::new()
                .with_config(SolverConfig::default().with_workers(4).with_split_depth(3))
                .solve(&records)
                .unwrap();

            assert_eq!(parallel.status, SolveStatus::Optimal);
            assert_eq!(parallel.elapsed, single.elapsed, "seed {seed}");
        }
    }

    #[test]
    fn test_budget_limited_large_instance() {
        let records = InstanceGenerator::new(10, 10).with_seed(2024).generate();
        let scheduler = JobShopScheduler::new().with_config(
            SolverConfig::default()
                .with_node_limit(2_000)
                .with_time_limit_ms(5_000),
        );
        let result = scheduler.solve(&records).unwrap();
        let model = ShopModel::build(&records).unwrap();

        assert!(
            result.status == SolveStatus::Feasible
                || (result.status == SolveStatus::Optimal && result.elapsed == result.lower_bound)
        );
        assert_eq!(result.timeline.len(), 100);
        assert!(result.elapsed >= result.lower_bound);
        assert!(check_invariants(&model, &result.timeline, result.lower_bound).is_empty());
    }

    #[test]
    fn test_no_budget_no_warm_start_is_unknown() {
        let records = testing::random_records(1, 3, 3);
        let result = JobShopScheduler::new()
            .with_config(
                SolverConfig::default()
                    .with_warm_start(false)
                    .with_node_limit(0),
            )
            .solve(&records)
            .unwrap();
        assert_eq!(result.status, SolveStatus::Unknown);
        assert_eq!(result.elapsed, 0);
        assert!(result.timeline.is_empty());
    }

    #[test]
    fn test_result_json_record() {
        let result = solve(&[TaskRecord::new("J1", "T1", 1, 2)]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "OPTIMAL");
        assert_eq!(value["elapsed"], 2);
        assert_eq!(value["timeline"][0]["tool_id"], serde_json::Value::Null);
    }
}
