//! Validation rules for form fields.
//!
//! A rule is anything implementing [`Validate`] (synchronous) or
//! [`ValidateAsync`] (asynchronous), wrapped in a [`Validator`] so it can be
//! bound to a field. Expected failures come back as
//! [`ValidationResult::Failed`]; errors are reserved for faults.
//!
//! # Example
//!
//! ```
//! use formwatch::validation::{length_pattern, Constraint, ALPHANUMERIC_PATTERN};
//!
//! let name = length_pattern(Constraint::new(8, 44).with_pattern(ALPHANUMERIC_PATTERN))?;
//! assert!(!name.is_async());
//! # Ok::<(), formwatch::error::ConfigError>(())
//! ```

mod constraint;
mod factory;
mod result;
mod validator;

pub use constraint::{ALPHANUMERIC_PATTERN, Constraint, DEFAULT_CHARSET};
pub use factory::{AsyncLengthValidator, LengthPatternValidator, async_length, length_pattern};
pub use result::ValidationResult;
pub use validator::{BoxFuture, Validate, ValidateAsync, Validator, Verdict};
