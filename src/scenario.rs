//! Nested scenario document adapter.
//!
//! Scenario documents group tasks under jobs:
//!
//! ```json
//! {
//!   "id": "BAFEF806ABAC",
//!   "scenarioJobs": [
//!     { "id": 19,
//!       "job": { "id": "JB_BREAD_BASIC",
//!                "tasks": [ { "id": "TSK_BB_MIX", "seq": 1, "duration": 2,
//!                             "tool": { "id": "MIXER_SPIRAL" } } ] } }
//!   ]
//! }
//! ```
//!
//! [`Scenario::to_task_records`] flattens the document into [`TaskRecord`]s in
//! document order. A `null` or absent `tool` means the task uses no tool.
//! Unknown fields (names, descriptions, flags) are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::TaskRecord;
use crate::validation::{ValidationError, ValidationErrorKind, ValidationErrors};

/// Top-level scenario document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Scenario identifier (string or number).
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub description: Option<String>,
    /// Jobs included in the scenario.
    #[serde(default)]
    pub scenario_jobs: Vec<ScenarioJob>,
}

/// One job entry of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioJob {
    /// Entry identifier (string or number).
    #[serde(default)]
    pub id: Value,
    pub job: JobSpec,
}

/// A job definition with its tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

/// A task definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    /// Occupied tool; `null` for none.
    #[serde(default)]
    pub tool: Option<ToolSpec>,
    /// Sequence number. Must be a JSON integer.
    #[serde(default)]
    pub seq: Option<Value>,
    pub duration: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A tool reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Scenario {
    /// Parses a scenario document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Flattens the scenario into task records, in document order.
    ///
    /// A `seq` that is present but not an integer is reported as
    /// [`ValidationErrorKind::InvalidSequence`]. A missing `seq` is left as
    /// `None` and rejected later by record validation.
    pub fn to_task_records(&self) -> Result<Vec<TaskRecord>, ValidationErrors> {
        let mut records = Vec::new();
        let mut errors = ValidationErrors::default();

        for entry in &self.scenario_jobs {
            let job = &entry.job;
            for task in &job.tasks {
                let seq = match &task.seq {
                    None | Some(Value::Null) => None,
                    Some(value) => match value.as_i64() {
                        Some(seq) => Some(seq),
                        None => {
                            errors.push(ValidationError::new(
                                ValidationErrorKind::InvalidSequence,
                                Some(records.len()),
                                &job.id,
                                &task.id,
                                format!("sequence must be an integer, got {value}"),
                            ));
                            None
                        }
                    },
                };

                records.push(TaskRecord {
                    job_id: job.id.clone(),
                    task_id: task.id.clone(),
                    tool_id: task.tool.as_ref().map(|t| t.id.clone()),
                    seq,
                    duration: task.duration,
                });
            }
        }

        errors.into_result().map(|()| records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two-recipe bakery scenario.
    pub(crate) const BAKERY: &str = r#"{
        "id": "BAFEF806ABAC",
        "description": "scenario test",
        "done": false,
        "createdAt": [2026, 1, 13, 16, 10, 37],
        "scenarioJobs": [
            {"id": 19, "job": {"id": "JB_BREAD_BASIC", "name": "Basic bread", "active": true, "tasks": [
                {"id": "TSK_BB_BAKE", "tool": {"id": "OVEN_DECK", "name": "Deck oven"}, "seq": 5, "duration": 3},
                {"id": "TSK_BB_COOL", "tool": {"id": "COOKING_RACK"}, "seq": 6, "duration": 2},
                {"id": "TSK_BB_MIX", "tool": {"id": "MIXER_SPIRAL"}, "seq": 1, "duration": 2},
                {"id": "TSK_BB_PACK", "tool": {"id": "PACK_TABLE"}, "seq": 7, "duration": 1},
                {"id": "TSK_BB_PROOF1", "tool": {"id": "PROOFER"}, "seq": 2, "duration": 6},
                {"id": "TSK_BB_PROOF2", "tool": {"id": "PROOFER"}, "seq": 4, "duration": 5},
                {"id": "TSK_BB_SHAPE", "tool": {"id": "PACK_TABLE"}, "seq": 3, "duration": 2}
            ]}},
            {"id": 20, "job": {"id": "JB_BREAD_WHOLE", "name": "Whole wheat bread", "active": true, "tasks": [
                {"id": "TSK_BW_BAKE", "tool": {"id": "OVEN_DECK"}, "seq": 5, "duration": 3},
                {"id": "TSK_BW_COOL", "tool": {"id": "COOKING_RACK"}, "seq": 6, "duration": 2},
                {"id": "TSK_BW_MIX", "tool": {"id": "MIXER_SPIRAL"}, "seq": 1, "duration": 3},
                {"id": "TSK_BW_PACK", "tool": {"id": "PACK_TABLE"}, "seq": 7, "duration": 1},
                {"id": "TSK_BW_PROOF1", "tool": {"id": "PROOFER"}, "seq": 2, "duration": 7},
                {"id": "TSK_BW_PROOF2", "tool": {"id": "PROOFER"}, "seq": 4, "duration": 6},
                {"id": "TSK_BW_SHAPE", "tool": {"id": "PACK_TABLE"}, "seq": 3, "duration": 2}
            ]}}
        ]
    }"#;

    #[test]
    fn test_flatten_bakery() {
        let scenario = Scenario::from_json(BAKERY).unwrap();
        assert_eq!(scenario.scenario_jobs.len(), 2);

        let records = scenario.to_task_records().unwrap();
        assert_eq!(records.len(), 14);
        assert_eq!(records[0].job_id, "JB_BREAD_BASIC");
        assert_eq!(records[0].task_id, "TSK_BB_BAKE");
        assert_eq!(records[0].tool_id.as_deref(), Some("OVEN_DECK"));
        assert_eq!(records[0].seq, Some(5));
        assert_eq!(records[13].task_id, "TSK_BW_SHAPE");

        let total: i64 = records.iter().map(|r| r.duration).sum();
        assert_eq!(total, 45);
    }

    #[test]
    fn test_null_tool_and_missing_seq() {
        let json = r#"{"scenarioJobs": [{"id": "a", "job": {"id": "J1", "tasks": [
            {"id": "T1", "tool": null, "seq": 1, "duration": 4},
            {"id": "T2", "duration": 2}
        ]}}]}"#;
        let records = Scenario::from_json(json).unwrap().to_task_records().unwrap();
        assert_eq!(records[0].tool_id, None);
        assert_eq!(records[1].seq, None);
    }

    #[test]
    fn test_non_integer_seq_rejected() {
        let json = r#"{"scenarioJobs": [{"job": {"id": "J1", "tasks": [
            {"id": "T1", "seq": "first", "duration": 4},
            {"id": "T2", "seq": 2.5, "duration": 2},
            {"id": "T3", "seq": 3, "duration": 2}
        ]}}]}"#;
        let errors = Scenario::from_json(json)
            .unwrap()
            .to_task_records()
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidSequence));
        let tasks: Vec<&str> = errors.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(tasks, vec!["T1", "T2"]);
    }

    #[test]
    fn test_malformed_document() {
        assert!(Scenario::from_json(r#"{"scenarioJobs": [{"job": {}}]}"#).is_err());
        assert!(Scenario::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_empty_scenario() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.to_task_records().unwrap().is_empty());
    }
}
