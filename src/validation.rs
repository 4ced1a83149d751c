//! Input validation for task records.
//!
//! Checks structural integrity of the normalized task list before a model is
//! built. Detects:
//! - Missing job or task identifiers
//! - Missing or unparseable sequence numbers
//! - Non-positive durations
//! - Duplicate `(job_id, task_id)` pairs
//! - Total duration overflowing the time type
//!
//! Shared sequence numbers inside a job are *not* errors; they are resolved
//! by input order. [`shared_sequences`] reports them for diagnostics.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::TaskRecord;

/// Validation result.
pub type ValidationResult = Result<(), ValidationErrors>;

/// A validation error, identifying the offending record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Position of the record in the input list, if known.
    pub index: Option<usize>,
    /// Job identifier of the offending record.
    pub job_id: String,
    /// Task identifier of the offending record.
    pub task_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Duration is zero or negative.
    NonPositiveDuration,
    /// Sequence number absent.
    MissingSequence,
    /// Sequence number present but not an integer.
    InvalidSequence,
    /// Job or task identifier is empty.
    MissingIdentifier,
    /// Two records share the same `(job_id, task_id)`.
    DuplicateTask,
    /// Sum of durations does not fit the time type.
    DurationOverflow,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        index: Option<usize>,
        job_id: impl Into<String>,
        task_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            index,
            job_id: job_id.into(),
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    fn for_record(
        kind: ValidationErrorKind,
        index: usize,
        record: &TaskRecord,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, Some(index), &record.job_id, &record.task_id, message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "record #{i} ({}/{}): {}", self.job_id, self.task_id, self.message),
            None => write!(f, "{}/{}: {}", self.job_id, self.task_id, self.message),
        }
    }
}

/// All validation errors detected in one pass.
#[derive(Debug, Clone, PartialEq, Default, thiserror::Error)]
#[error("{} validation error(s): {}", .0.len(), join_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Whether no error was collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any error has the given kind.
    pub fn contains_kind(&self, kind: &ValidationErrorKind) -> bool {
        self.0.iter().any(|e| &e.kind == kind)
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub(crate) fn into_result(self) -> ValidationResult {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates normalized task records.
///
/// Checks:
/// 1. Job and task identifiers are non-empty
/// 2. Every record has a sequence number
/// 3. Every duration is positive
/// 4. No duplicate `(job_id, task_id)`
/// 5. The horizon (sum of durations) does not overflow
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_records(records: &[TaskRecord]) -> ValidationResult {
    let mut errors = ValidationErrors::default();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut horizon: Option<i64> = Some(0);

    for (i, record) in records.iter().enumerate() {
        if record.job_id.is_empty() || record.task_id.is_empty() {
            errors.push(ValidationError::for_record(
                ValidationErrorKind::MissingIdentifier,
                i,
                record,
                "job_id and task_id must be non-empty",
            ));
        }

        if record.seq.is_none() {
            errors.push(ValidationError::for_record(
                ValidationErrorKind::MissingSequence,
                i,
                record,
                "missing sequence number",
            ));
        }

        if record.duration <= 0 {
            errors.push(ValidationError::for_record(
                ValidationErrorKind::NonPositiveDuration,
                i,
                record,
                format!("duration must be positive, got {}", record.duration),
            ));
        } else {
            horizon = horizon.and_then(|h| h.checked_add(record.duration));
        }

        if !seen.insert((record.job_id.as_str(), record.task_id.as_str())) {
            errors.push(ValidationError::for_record(
                ValidationErrorKind::DuplicateTask,
                i,
                record,
                "duplicate task in job",
            ));
        }
    }

    if horizon.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            None,
            "*",
            "*",
            "sum of task durations overflows",
        ));
    }

    errors.into_result()
}

/// Lists `(job_id, seq)` pairs used by more than one task of the same job.
///
/// Records without a sequence number are ignored. Output follows the order in
/// which the duplicates are first seen.
pub fn shared_sequences(records: &[TaskRecord]) -> Vec<(String, i64)> {
    let mut counts: HashMap<(&str, i64), usize> = HashMap::new();
    let mut shared = Vec::new();

    for record in records {
        let Some(seq) = record.seq else { continue };
        let count = counts.entry((record.job_id.as_str(), seq)).or_insert(0);
        *count += 1;
        if *count == 2 {
            shared.push((record.job_id.clone(), seq));
        }
    }

    shared
}
