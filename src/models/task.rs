//! Task record model.
//!
//! A task record is one normalized row of input: a single processing step of
//! a job, with a position (`seq`) inside the job, a fixed duration and at most
//! one tool it occupies exclusively while it runs.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2 (job shop)

use serde::{Deserialize, Serialize};

/// A normalized task record (one operation of a job).
///
/// # Time Representation
/// Durations and all derived times are integer time units relative to the
/// scheduling epoch (t=0). The consumer defines the unit (minutes, ms, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Owning job identifier.
    pub job_id: String,
    /// Task identifier (unique within its job).
    pub task_id: String,
    /// Tool used exclusively by this task. `None` = no shared resource.
    #[serde(default)]
    pub tool_id: Option<String>,
    /// Position within the job. `None` is rejected by validation.
    #[serde(default)]
    pub seq: Option<i64>,
    /// Processing time (must be positive).
    pub duration: i64,
}

impl TaskRecord {
    /// Creates a tool-less task record.
    pub fn new(
        job_id: impl Into<String>,
        task_id: impl Into<String>,
        seq: i64,
        duration: i64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            task_id: task_id.into(),
            tool_id: None,
            seq: Some(seq),
            duration,
        }
    }

    /// Sets the tool this task occupies.
    pub fn with_tool(mut self, tool_id: impl Into<String>) -> Self {
        self.tool_id = Some(tool_id.into());
        self
    }

    /// Returns the tool identifier, treating an empty string as no tool.
    pub fn tool(&self) -> Option<&str> {
        self.tool_id.as_deref().filter(|t| !t.is_empty())
    }
}
