//! Timeline extraction and invariant checking.
//!
//! Turns a solver [`Candidate`] into caller-facing [`TimelineEntry`] records,
//! ordered by job (first appearance in the input) and then by sequence
//! number, and re-checks the produced timeline against the model.

use std::collections::HashMap;

use crate::bnb::Candidate;
use crate::models::{TimelineEntry, Violation, ViolationType};
use crate::shop::ShopModel;

/// Builds the timeline of a complete schedule.
pub fn extract_timeline(model: &ShopModel, candidate: &Candidate) -> Vec<TimelineEntry> {
    model
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let start = candidate.start(i);
            TimelineEntry {
                job_id: task.job_id.clone(),
                task_id: task.task_id.clone(),
                tool_id: task.tool_id.clone(),
                start,
                end: start + task.duration,
                duration: task.duration,
            }
        })
        .collect()
}

/// Checks a timeline against the model.
///
/// Verified properties:
/// - one entry per model task, in model order
/// - `end = start + duration`, and every interval lies inside `[0, horizon]`
/// - each task starts no earlier than its job predecessor ends
/// - no two entries on the same tool overlap (half-open intervals)
/// - the makespan is not below `lower_bound`
///
/// Returns an empty list for a valid timeline.
pub fn check_invariants(
    model: &ShopModel,
    timeline: &[TimelineEntry],
    lower_bound: i64,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if timeline.len() != model.task_count() {
        violations.push(Violation::new(
            ViolationType::MissingTask,
            "timeline",
            format!(
                "expected {} entries, found {}",
                model.task_count(),
                timeline.len()
            ),
        ));
        return violations;
    }

    for (task, entry) in model.tasks().iter().zip(timeline) {
        let entity = format!("{}/{}", entry.job_id, entry.task_id);
        if task.job_id != entry.job_id || task.task_id != entry.task_id {
            violations.push(Violation::new(
                ViolationType::MissingTask,
                entity.clone(),
                format!("expected {}/{} at this position", task.job_id, task.task_id),
            ));
        }
        if entry.duration != task.duration || entry.end != entry.start + entry.duration {
            violations.push(Violation::new(
                ViolationType::DurationMismatch,
                entity.clone(),
                format!(
                    "[{}, {}) does not span duration {}",
                    entry.start, entry.end, task.duration
                ),
            ));
        }
        if entry.start < 0 || entry.end > model.horizon() {
            violations.push(Violation::new(
                ViolationType::OutsideHorizon,
                entity,
                format!(
                    "[{}, {}) outside [0, {}]",
                    entry.start,
                    entry.end,
                    model.horizon()
                ),
            ));
        }
    }

    for job in model.jobs() {
        for pair in job.tasks.windows(2) {
            let (prev, next) = (&timeline[pair[0]], &timeline[pair[1]]);
            if next.start < prev.end {
                violations.push(Violation::new(
                    ViolationType::PrecedenceViolation,
                    format!("{}/{}", next.job_id, next.task_id),
                    format!(
                        "starts at {} before {} ends at {}",
                        next.start, prev.task_id, prev.end
                    ),
                ));
            }
        }
    }

    let mut by_tool: HashMap<&str, Vec<&TimelineEntry>> = HashMap::new();
    for entry in timeline {
        if let Some(tool) = entry.tool_id.as_deref() {
            by_tool.entry(tool).or_default().push(entry);
        }
    }
    let mut tools: Vec<_> = by_tool.into_iter().collect();
    tools.sort_by(|a, b| a.0.cmp(b.0));
    for (tool, mut entries) in tools {
        entries.sort_by_key(|e| (e.start, e.end));
        for pair in entries.windows(2) {
            if pair[0].overlaps(pair[1]) {
                violations.push(Violation::new(
                    ViolationType::ToolOverlap,
                    tool,
                    format!(
                        "{}/{} [{}, {}) overlaps {}/{} [{}, {})",
                        pair[0].job_id,
                        pair[0].task_id,
                        pair[0].start,
                        pair[0].end,
                        pair[1].job_id,
                        pair[1].task_id,
                        pair[1].start,
                        pair[1].end
                    ),
                ));
            }
        }
    }

    let makespan = timeline.iter().map(|e| e.end).max().unwrap_or(0);
    if makespan < lower_bound {
        violations.push(Violation::new(
            ViolationType::BelowLowerBound,
            "timeline",
            format!("makespan {makespan} below lower bound {lower_bound}"),
        ));
    }

    violations
}
