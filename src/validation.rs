use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// One failed field rule, reported back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Run every rule on the payload and reject with the full violation list if
/// any failed. Rules are independent; nothing short-circuits.
pub fn check<T: Validate>(payload: &T) -> Result<(), ApiError> {
    match payload.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(ApiError::Validation(collect_violations(&errors))),
    }
}

/// Flatten `validator`'s nested error map into `{field, message}` pairs.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldViolation {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string()),
            })
        })
        .collect();

    // field_errors() iterates a map; keep the output stable for callers.
    violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    violations
}

pub fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("username may only contain alphanumeric characters".into());
        Err(error)
    }
}
