//! Fixture file validation.
//!
//! # Responsibilities
//! - Semantic validation of canned responses (serde handles syntactic)
//! - Check status codes and header names/values
//! - Reject responses that set both `body` and `json`
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: &ResponseSpec → Result<ResponseParts, Vec<ValidationError>>

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::schema::ResponseSpec;

/// A single problem found in a response spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("status {0} is not a valid HTTP status code")]
    InvalidStatus(u16),

    #[error("header name \"{0}\" is invalid")]
    InvalidHeaderName(String),

    #[error("header \"{0}\" has an invalid value")]
    InvalidHeaderValue(String),

    #[error("`body` and `json` cannot both be set")]
    ConflictingBody,
}

/// Typed status and headers of a validated response spec.
#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Validate a response spec, collecting every error.
pub fn validate_response(spec: &ResponseSpec) -> Result<ResponseParts, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let status = match StatusCode::from_u16(spec.status) {
        Ok(status) => Some(status),
        Err(_) => {
            errors.push(ValidationError::InvalidStatus(spec.status));
            None
        }
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &spec.headers {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
            continue;
        };
        match HeaderValue::from_str(value) {
            Ok(header_value) => {
                headers.insert(header_name, header_value);
            }
            Err(_) => errors.push(ValidationError::InvalidHeaderValue(name.clone())),
        }
    }

    if spec.body.is_some() && spec.json.is_some() {
        errors.push(ValidationError::ConflictingBody);
    }

    match status {
        Some(status) if errors.is_empty() => Ok(ResponseParts { status, headers }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_response() {
        let mut spec = ResponseSpec {
            status: 201,
            body: Some("created".into()),
            ..ResponseSpec::default()
        };
        spec.headers.insert("X-Fixture".into(), "yes".into());

        let parts = validate_response(&spec).unwrap();
        assert_eq!(parts.status, StatusCode::CREATED);
        assert_eq!(parts.headers["x-fixture"], "yes");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut spec = ResponseSpec {
            status: 42,
            body: Some("text".into()),
            json: Some(serde_json::json!({})),
            ..ResponseSpec::default()
        };
        spec.headers.insert("bad header".into(), "v".into());
        spec.headers.insert("x-ok".into(), "line\nbreak".into());

        let errors = validate_response(&spec).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidStatus(42),
                ValidationError::InvalidHeaderName("bad header".into()),
                ValidationError::InvalidHeaderValue("x-ok".into()),
                ValidationError::ConflictingBody,
            ]
        );
    }
}
