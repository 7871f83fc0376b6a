//! Built-in validators and the functions that build them.

use regex::Regex;

use super::constraint::Constraint;
use super::result::ValidationResult;
use super::validator::{BoxFuture, Validate, ValidateAsync, Validator, Verdict};
use crate::error::ConfigError;

/// Length bounds plus optional whole-value pattern.
#[derive(Debug, Clone)]
pub struct LengthPatternValidator {
    constraint: Constraint,
    regex: Option<Regex>,
}

impl LengthPatternValidator {
    /// Build a validator from a constraint.
    ///
    /// Fails if `min > max` or the pattern does not compile. The pattern is
    /// anchored on both ends, so it must match the entire value.
    pub fn new(constraint: Constraint) -> Result<Self, ConfigError> {
        if constraint.min > constraint.max {
            return Err(ConfigError::InvertedBounds {
                min: constraint.min,
                max: constraint.max,
            });
        }

        let regex = constraint
            .pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
                    ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: err.to_string(),
                    }
                })
            })
            .transpose()?;

        Ok(Self { constraint, regex })
    }

    /// The constraint this validator enforces.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

impl Validate for LengthPatternValidator {
    fn validate(&self, value: &str) -> Verdict {
        if value.is_empty() {
            return Ok(ValidationResult::Passed);
        }

        let len = value.chars().count();
        if len < self.constraint.min || len > self.constraint.max {
            return Ok(ValidationResult::failed(self.constraint.describe(false)));
        }

        if let Some(regex) = &self.regex
            && !regex.is_match(value)
        {
            return Ok(ValidationResult::failed(self.constraint.describe(true)));
        }

        Ok(ValidationResult::Passed)
    }
}

/// Maximum-length check that settles asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncLengthValidator {
    max: usize,
}

impl AsyncLengthValidator {
    /// Build a validator allowing at most `max` characters.
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    /// The maximum length.
    pub fn max(&self) -> usize {
        self.max
    }
}

impl ValidateAsync for AsyncLengthValidator {
    fn validate(&self, value: String) -> BoxFuture<'static, Verdict> {
        let max = self.max;
        Box::pin(async move {
            tokio::task::yield_now().await;
            if value.chars().count() > max {
                Ok(ValidationResult::failed(format!(
                    "Enter {max} or fewer characters"
                )))
            } else {
                Ok(ValidationResult::Passed)
            }
        })
    }
}

/// Build a synchronous length/pattern validator.
pub fn length_pattern(constraint: Constraint) -> Result<Validator, ConfigError> {
    LengthPatternValidator::new(constraint).map(Validator::sync)
}

/// Build an asynchronous max-length validator.
///
/// Infallible for `usize` input; the `Result` keeps the signature in line
/// with [`length_pattern`] and the signed config path.
pub fn async_length(max: usize) -> Result<Validator, ConfigError> {
    Ok(Validator::asynchronous(AsyncLengthValidator::new(max)))
}
