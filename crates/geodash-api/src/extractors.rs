//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request bodies and helpers to
//! extract and validate JSON bodies in handlers.

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::json;

use crate::error::AppError;

/// Longest zone, country code or sector value accepted in an event.
pub const MAX_FIELD_LEN: usize = 256;

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Length limit the field exceeded, if that was the failure.
    pub max_len: Option<usize>,
}

impl FieldError {
    /// `field` is longer than `max_len` bytes.
    pub fn too_long(field: &str, max_len: usize) -> Self {
        Self {
            field: field.to_string(),
            message: format!("must not exceed {max_len} bytes"),
            max_len: Some(max_len),
        }
    }

    /// Machine-readable form for the error body's `details`.
    pub fn details(&self) -> serde_json::Value {
        match self.max_len {
            Some(max_len) => json!({ "field": self.field, "max_len": max_len }),
            None => json!({ "field": self.field }),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Trait for request types with rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldError>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), FieldError> {
            if self.name.len() > MAX_FIELD_LEN {
                return Err(FieldError::too_long("name", MAX_FIELD_LEN));
            }
            Ok(())
        }
    }

    #[test]
    fn valid_json_passes_through() {
        let value = Named {
            name: "East Asia".to_string(),
        };
        let extracted = extract_validated_json(Ok(Json(value))).unwrap();
        assert_eq!(extracted.name, "East Asia");
    }

    #[test]
    fn validation_failure_is_422() {
        let value = Named {
            name: "x".repeat(MAX_FIELD_LEN + 1),
        };
        let err = extract_validated_json(Ok(Json(value))).unwrap_err();
        match err {
            AppError::Validation(field) => {
                assert_eq!(field.field, "name");
                assert_eq!(field.max_len, Some(MAX_FIELD_LEN));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn field_error_details() {
        let err = FieldError::too_long("zone", 8);
        assert_eq!(err.to_string(), "zone must not exceed 8 bytes");
        assert_eq!(err.details(), json!({ "field": "zone", "max_len": 8 }));
    }
}
