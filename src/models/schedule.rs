//! Timeline (solution) model.
//!
//! A solve produces a status, the makespan (`elapsed`) and one timeline entry
//! per task. Invariant checks on a produced timeline report `Violation`s.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::bnb::SearchStatistics;

/// Outcome classification of a solve.
///
/// Serialized with the upper-case names consumers of the timeline expect
/// (`"OPTIMAL"`, `"FEASIBLE"`, `"INFEASIBLE"`, `"UNKNOWN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// The search tree was exhausted, or the incumbent meets the lower bound.
    Optimal,
    /// A schedule was found but the budget ran out before proving optimality.
    Feasible,
    /// The tree was exhausted without any schedule.
    Infeasible,
    /// The budget ran out before any schedule was found.
    Unknown,
}

impl SolveStatus {
    /// Status name as reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the status carries a schedule.
    pub fn has_schedule(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Owning job identifier.
    pub job_id: String,
    /// Task identifier.
    pub task_id: String,
    /// Occupied tool (`null` when the task uses none).
    pub tool_id: Option<String>,
    /// Start time.
    pub start: i64,
    /// End time (`start + duration`).
    pub end: i64,
    /// Processing time.
    pub duration: i64,
}

impl TimelineEntry {
    /// Whether the half-open intervals `[start, end)` of two entries intersect.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Result record of a solve.
///
/// Serializes to `{status, elapsed, timeline}`. The lower bound and search
/// statistics are kept for callers in-process and are not part of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    /// Solve outcome.
    pub status: SolveStatus,
    /// Makespan of the returned timeline (0 when no schedule exists).
    pub elapsed: i64,
    /// Entries ordered by job (first appearance in input), then by sequence.
    pub timeline: Vec<TimelineEntry>,
    /// Global lower bound on the makespan.
    #[serde(skip)]
    pub lower_bound: i64,
    /// Counters collected during search.
    #[serde(skip)]
    pub statistics: SearchStatistics,
}

impl SolveResult {
    /// Makespan (alias of `elapsed`).
    #[inline]
    pub fn makespan(&self) -> i64 {
        self.elapsed
    }

    /// Whether optimality was proven.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Relative distance between the makespan and the lower bound.
    ///
    /// Returns `None` when there is no schedule or the bound is zero.
    pub fn optimality_gap(&self) -> Option<f64> {
        if !self.status.has_schedule() || self.lower_bound <= 0 {
            return None;
        }
        Some((self.elapsed - self.lower_bound) as f64 / self.lower_bound as f64)
    }

    /// Finds the entry for a task.
    pub fn entry(&self, job_id: &str, task_id: &str) -> Option<&TimelineEntry> {
        self.timeline
            .iter()
            .find(|e| e.job_id == job_id && e.task_id == task_id)
    }

    /// Returns all entries of a job, in sequence order.
    pub fn entries_for_job(&self, job_id: &str) -> Vec<&TimelineEntry> {
        self.timeline.iter().filter(|e| e.job_id == job_id).collect()
    }

    /// Returns all entries occupying a tool, sorted by start time.
    pub fn entries_for_tool(&self, tool_id: &str) -> Vec<&TimelineEntry> {
        let mut entries: Vec<&TimelineEntry> = self
            .timeline
            .iter()
            .filter(|e| e.tool_id.as_deref() == Some(tool_id))
            .collect();
        entries.sort_by_key(|e| (e.start, e.end));
        entries
    }

    /// Completion time of a job (latest end of its entries).
    pub fn job_completion_time(&self, job_id: &str) -> Option<i64> {
        self.entries_for_job(job_id).iter().map(|e| e.end).max()
    }

    /// Busy time per tool.
    pub fn tool_busy_times(&self) -> HashMap<String, i64> {
        let mut busy: HashMap<String, i64> = HashMap::new();
        for e in &self.timeline {
            if let Some(tool) = &e.tool_id {
                *busy.entry(tool.clone()).or_insert(0) += e.duration;
            }
        }
        busy
    }
}

/// An invariant violation found in a produced timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (`job/task` or tool id).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timeline invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// `end != start + duration`.
    DurationMismatch,
    /// A task starts before its job predecessor ends.
    PrecedenceViolation,
    /// Two tasks overlap on the same tool.
    ToolOverlap,
    /// A start or end lies outside `[0, horizon]`.
    OutsideHorizon,
    /// Makespan below a proven lower bound.
    BelowLowerBound,
    /// Timeline does not cover the model's tasks one-to-one.
    MissingTask,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on {}: {}", self.violation_type, self.entity_id, self.message)
    }
}
