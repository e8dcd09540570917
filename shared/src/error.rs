//! Errors raised by the scoring core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single problem found while validating a rule set or quarter content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Reason reported when point values overflow
pub const POINTS_TOO_LARGE: &str = "point values are too large";

/// Scoring core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// A guess or sample that cannot be scored. Raised on the first problem found.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Every violation found in a rule set, reported together.
    #[error("invalid scoring configuration: {}", join_violations(.0))]
    InvalidConfiguration(Vec<FieldViolation>),
}

impl ScoringError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Arithmetic on point values left the representable range
    pub fn too_large(field: impl Into<String>) -> Self {
        Self::invalid_input(field, POINTS_TOO_LARGE)
    }

    /// Violations carried by an `InvalidConfiguration` error, empty otherwise
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ScoringError::InvalidConfiguration(violations) => violations,
            ScoringError::InvalidInput { .. } => &[],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for the scoring core
pub type ScoringResult<T> = Result<T, ScoringError>;
