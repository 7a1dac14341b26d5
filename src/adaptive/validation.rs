use serde::Serialize;
use thiserror::Error;

use crate::adaptive::types::{ExerciseOutcome, PerformanceSnapshot};

pub const MIN_PERFORMANCE: f64 = 0.0;
pub const MAX_PERFORMANCE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub fn validate_exercise_type(exercise_type: &str) -> Result<(), ValidationError> {
    if exercise_type.trim().is_empty() {
        return Err(ValidationError::new("exerciseType", "must not be empty"));
    }
    Ok(())
}

pub fn validate_performance(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if !(MIN_PERFORMANCE..=MAX_PERFORMANCE).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("must be within [0, 100], got {value}"),
        ));
    }
    Ok(())
}

/// Checks the current attempt. History entries are checked separately, and only
/// the ones that fall inside the trend window.
pub fn validate_snapshot(snapshot: &PerformanceSnapshot) -> Result<(), ValidationError> {
    validate_exercise_type(&snapshot.exercise_type)?;
    validate_performance("userPerformance", snapshot.user_performance)
}

pub fn validate_outcome(index: usize, outcome: &ExerciseOutcome) -> Result<(), ValidationError> {
    validate_performance(
        &format!("recentHistory[{index}].performance"),
        outcome.performance,
    )
}
