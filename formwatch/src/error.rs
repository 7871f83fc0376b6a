//! Error types for validator configuration and validator faults.

use std::any::Any;

use thiserror::Error;

use crate::form::FieldId;

/// Errors raised while building validators or loading form configuration.
///
/// These are construction-time errors: a field never becomes usable with
/// a configuration that produced one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// Parser message from the regex engine.
        reason: String,
    },

    /// `min` is greater than `max`.
    #[error("Inverted length bounds: min {min} > max {max}")]
    InvertedBounds {
        /// Configured minimum length.
        min: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// A length bound is negative.
    #[error("Length bound '{bound}' must not be negative (got {value})")]
    NegativeBound {
        /// Which bound ("min" or "max").
        bound: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The configuration document could not be parsed.
    #[error("Malformed form configuration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Unmodeled error returned by a validator.
///
/// Expected failures are `ValidationResult::Failed`; this is for
/// everything else (a lookup that could not be performed, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidatorError {
    /// Error message
    pub message: String,
}

impl ValidatorError {
    /// Create a new validator error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ValidatorError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidatorError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Fault information passed to the `FormController::on_fault` hook.
///
/// A fault never reaches the caller of `on_field_input`; the field is
/// marked invalid with a generic message instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Field '{field}' (generation {generation}): {kind}")]
pub struct ValidatorFault {
    /// Field whose validation run faulted.
    pub field: FieldId,
    /// Generation of the run that faulted.
    pub generation: u64,
    /// Fault details.
    pub kind: FaultKind,
}

/// The kind of validator fault that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// A validator returned an error instead of a result.
    #[error("validator returned an error: {0}")]
    Error(ValidatorError),

    /// A validator panicked.
    #[error("validator panicked: {0}")]
    Panic(String),

    /// An asynchronous validator had no tokio runtime to run on.
    #[error("no async runtime available for asynchronous validator")]
    NoRuntime,
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. Anything else
/// falls back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_panic_message() {
        let panic: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(extract_panic_message(&panic), "boom");

        let panic: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(extract_panic_message(&panic), "bang");

        let panic: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(extract_panic_message(&panic), "Unknown panic");
    }

    #[test]
    fn test_fault_display() {
        let fault = ValidatorFault {
            field: FieldId::Description,
            generation: 3,
            kind: FaultKind::Panic("oops".into()),
        };
        let display = fault.to_string();
        assert!(display.contains("description"));
        assert!(display.contains("generation 3"));
        assert!(display.contains("oops"));
    }

    #[test]
    fn test_config_error_from_json() {
        let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }
}
