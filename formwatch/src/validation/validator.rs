//! Validator plug-in contract.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::result::ValidationResult;
use crate::error::ValidatorError;

/// Type alias for boxed futures used in async validation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a validator hands back: a verdict, or an unmodeled error.
pub type Verdict = Result<ValidationResult, ValidatorError>;

/// A synchronous validation rule.
///
/// Implementors must be stateless from the engine's point of view: the
/// same value always yields the same verdict, and one instance may be
/// shared by any number of fields.
pub trait Validate: Send + Sync {
    /// Check `value`.
    fn validate(&self, value: &str) -> Verdict;
}

/// An asynchronous validation rule.
///
/// The returned future owns everything it needs; the engine may still be
/// polling it after the field has moved on to a newer value.
pub trait ValidateAsync: Send + Sync {
    /// Check `value`, settling later.
    fn validate(&self, value: String) -> BoxFuture<'static, Verdict>;
}

/// A validator bound to a field.
///
/// Cloning is cheap; both variants are reference counted.
#[derive(Clone)]
pub enum Validator {
    /// Runs inline on the caller's thread.
    Sync(Arc<dyn Validate>),
    /// Suspends the run until its future settles.
    Async(Arc<dyn ValidateAsync>),
}

impl Validator {
    /// Wrap a synchronous rule.
    pub fn sync(rule: impl Validate + 'static) -> Self {
        Self::Sync(Arc::new(rule))
    }

    /// Wrap an asynchronous rule.
    pub fn asynchronous(rule: impl ValidateAsync + 'static) -> Self {
        Self::Async(Arc::new(rule))
    }

    /// Build a synchronous rule from a predicate.
    ///
    /// The predicate is not consulted for empty values, which always pass.
    ///
    /// ```
    /// use formwatch::validation::{Validate, ValidationResult, Validator};
    ///
    /// let no_admin = Validator::rule(|v| !v.eq_ignore_ascii_case("admin"), "Reserved name");
    /// # let Validator::Sync(rule) = no_admin else { unreachable!() };
    /// assert_eq!(rule.validate("Admin").unwrap(), ValidationResult::failed("Reserved name"));
    /// ```
    pub fn rule<F>(predicate: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::sync(RuleFn {
            predicate,
            message: msg.into(),
        })
    }

    /// Build an asynchronous rule from a predicate returning a future.
    pub fn rule_async<F, Fut>(predicate: F, msg: impl Into<String>) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let message = msg.into();
        Self::asynchronous(AsyncRuleFn(move |value: String| {
            let message = message.clone();
            let empty = value.is_empty();
            let fut = predicate(value);
            Box::pin(async move {
                if empty || fut.await {
                    Ok(ValidationResult::Passed)
                } else {
                    Ok(ValidationResult::Failed { message })
                }
            }) as BoxFuture<'static, Verdict>
        }))
    }

    /// Check if this validator suspends.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Validator::Sync(..)"),
            Self::Async(_) => f.write_str("Validator::Async(..)"),
        }
    }
}

struct RuleFn<F> {
    predicate: F,
    message: String,
}

impl<F> Validate for RuleFn<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, value: &str) -> Verdict {
        if value.is_empty() || (self.predicate)(value) {
            Ok(ValidationResult::Passed)
        } else {
            Ok(ValidationResult::failed(self.message.clone()))
        }
    }
}

struct AsyncRuleFn<F>(F);

impl<F> ValidateAsync for AsyncRuleFn<F>
where
    F: Fn(String) -> BoxFuture<'static, Verdict> + Send + Sync,
{
    fn validate(&self, value: String) -> BoxFuture<'static, Verdict> {
        (self.0)(value)
    }
}
