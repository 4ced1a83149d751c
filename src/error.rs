//! Error types for the solver.

use crate::models::Violation;
use crate::validation::ValidationErrors;

/// Top-level error type of a solve.
///
/// Budget exhaustion is not an error: it yields a `FEASIBLE` or `UNKNOWN`
/// result instead.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    /// Malformed input, detected before any search.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The nested scenario document could not be decoded.
    #[error("scenario decoding failed: {0}")]
    Scenario(#[from] serde_json::Error),

    /// A produced schedule broke a timeline invariant (a solver defect).
    #[error("internal invariant violated ({} violation(s)): {}", .0.len(), first_violation(.0))]
    InvariantViolation(Vec<Violation>),
}

/// Result alias for solver operations.
pub type Result<T> = std::result::Result<T, SolveError>;

fn first_violation(violations: &[Violation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViolationType;
    use crate::validation::{ValidationError, ValidationErrorKind};

    #[test]
    fn test_validation_error_display() {
        let errors = ValidationErrors(vec![ValidationError::new(
            ValidationErrorKind::NonPositiveDuration,
            Some(0),
            "J1",
            "T1",
            "duration must be positive, got 0",
        )]);
        let err = SolveError::from(errors);
        assert_eq!(
            err.to_string(),
            "invalid input: 1 validation error(s): record #0 (J1/T1): duration must be positive, got 0"
        );
    }

    #[test]
    fn test_invariant_violation_display() {
        let err = SolveError::InvariantViolation(vec![Violation::new(
            ViolationType::ToolOverlap,
            "OVEN",
            "J1/T1 overlaps J2/T1",
        )]);
        let message = err.to_string();
        assert!(message.contains("1 violation(s)"));
        assert!(message.contains("ToolOverlap on OVEN"));
    }

    #[test]
    fn test_scenario_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SolveError = json_err.into();
        assert!(matches!(err, SolveError::Scenario(_)));
    }
}
