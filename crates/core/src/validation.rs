//! Input validation utilities.
//!
//! Field constraints shared by the full record and the partial update. Checks
//! collect every offending field rather than stopping at the first, so a
//! caller can be told about all problems with a request in one response.

use serde::Serialize;
use utoipa::ToSchema;

/// A single field that failed validation.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// All field issues found while validating one input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns `Ok(())` when nothing was recorded, otherwise the collected issues.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", issue.field, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Takes a required value, recording `field` as missing when absent.
pub fn require<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(field, "field required");
    }
    value
}

/// Validates an age in whole years.
///
/// Ages are accepted as signed integers so a negative value can be reported
/// as a range error instead of a type error.
pub fn check_age(errors: &mut ValidationErrors, age: i64) -> Option<u32> {
    if age < 0 {
        errors.push("age", "must be greater than or equal to 0");
        return None;
    }
    match u32::try_from(age) {
        Ok(age) => Some(age),
        Err(_) => {
            errors.push("age", "is out of range");
            None
        }
    }
}

/// Validates a strictly positive, finite measurement such as height or weight.
pub fn check_positive(errors: &mut ValidationErrors, field: &str, value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        errors.push(field, "must be greater than 0");
        None
    }
}
