//! Field-level validation for request payloads.
//!
//! Payload types implement [`Validate`] and report every failing field at once.
//! The HTTP layer turns a non-empty error list into a 422 response.

use serde::Serialize;

/// One failing field, located the way clients address it (`["body", "weight"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
        }
    }

    /// Error for a request body field.
    pub fn body(field: &str, msg: impl Into<String>) -> Self {
        Self::new(&["body", field], msg)
    }

    /// Error for a query string parameter.
    pub fn query(param: &str, msg: impl Into<String>) -> Self {
        Self::new(&["query", param], msg)
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

/// Semantic checks run after a payload deserialized successfully.
pub trait Validate {
    /// Return every problem found; an empty list means the payload is valid.
    fn validate(&self) -> Vec<FieldError>;
}

/// Require `1..=max` characters after trimming.
pub fn check_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::body(field, "must not be empty"));
    } else if len > max {
        errors.push(FieldError::body(field, format!("must be at most {} characters", max)));
    }
}

/// Loose `local@domain.tld` shape check.
pub fn check_email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    };
    if !valid {
        errors.push(FieldError::body(field, "value is not a valid email address"));
    }
}
