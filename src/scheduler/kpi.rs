//! Schedule quality metrics (KPIs).
//!
//! Computes performance indicators from a solved timeline.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Tool utilization | Busy time / makespan, per tool |
//! | Avg Utilization | Mean tool utilization |
//! | Avg Flow Time | Mean job completion time (all jobs released at 0) |
//! | Optimality gap | (makespan − lower bound) / lower bound |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::SolveResult;

/// Schedule performance indicators.
///
/// All time values are in the caller's time unit.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Average tool utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-tool utilization.
    pub utilization_by_tool: HashMap<String, f64>,
    /// Completion time per job.
    pub job_completion: HashMap<String, i64>,
    /// Mean job completion time.
    pub avg_flow_time: f64,
    /// Relative gap to the lower bound, when known.
    pub optimality_gap: Option<f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from a solve result.
    pub fn calculate(result: &SolveResult) -> Self {
        let makespan = result.makespan();

        let utilization_by_tool: HashMap<String, f64> = result
            .tool_busy_times()
            .into_iter()
            .map(|(tool, busy)| {
                let utilization = if makespan > 0 {
                    busy as f64 / makespan as f64
                } else {
                    0.0
                };
                (tool, utilization)
            })
            .collect();
        let avg_utilization = if utilization_by_tool.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_tool.values().sum();
            sum / utilization_by_tool.len() as f64
        };

        let mut job_completion: HashMap<String, i64> = HashMap::new();
        for entry in &result.timeline {
            let end = job_completion.entry(entry.job_id.clone()).or_insert(0);
            *end = (*end).max(entry.end);
        }
        let avg_flow_time = if job_completion.is_empty() {
            0.0
        } else {
            job_completion.values().sum::<i64>() as f64 / job_completion.len() as f64
        };

        Self {
            makespan,
            avg_utilization,
            utilization_by_tool,
            job_completion,
            avg_flow_time,
            optimality_gap: result.optimality_gap(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}
