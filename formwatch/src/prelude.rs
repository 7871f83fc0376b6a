//! Commonly used types.

pub use crate::config::{FormConfig, RuleConfig};
pub use crate::error::{ConfigError, FaultKind, ValidatorError, ValidatorFault};
pub use crate::form::{
    DisplayState, FieldId, FieldOutcome, FormController, FormSnapshot, GroupValidity, Submission,
};
pub use crate::signal::{Signal, Subscription};
pub use crate::validation::{
    AsyncLengthValidator, BoxFuture, Constraint, LengthPatternValidator, Validate,
    ValidateAsync, ValidationResult, Validator, Verdict,
};
