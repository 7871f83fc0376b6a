//! Declarative length and character-set constraints.

/// Charset description used when none is configured.
pub const DEFAULT_CHARSET: &str = "A-Z, a-z, 0-9";

/// Pattern accepting letters, digits, spaces and hyphens.
pub const ALPHANUMERIC_PATTERN: &str = "^[-a-zA-Z0-9 ]*$";

/// Length bounds plus an optional pattern.
///
/// A constraint is plain data; it is checked when a validator is built
/// from it (see [`LengthPatternValidator::new`](super::LengthPatternValidator::new)).
///
/// # Example
///
/// ```
/// use formwatch::validation::{Constraint, ALPHANUMERIC_PATTERN};
///
/// let name = Constraint::new(8, 44).with_pattern(ALPHANUMERIC_PATTERN);
/// assert_eq!(name.describe(false), "8-44 characters (A-Z, a-z, 0-9)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Minimum length in characters (inclusive).
    pub min: usize,
    /// Maximum length in characters (inclusive).
    pub max: usize,
    /// Regex the whole value must match.
    pub pattern: Option<String>,
    /// Human-readable description of the allowed characters.
    pub charset: String,
}

impl Constraint {
    /// Create a length-only constraint.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            pattern: None,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }

    /// Set the pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the charset description.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Failure message for this constraint.
    ///
    /// `restricted` selects the pattern-mismatch wording.
    pub fn describe(&self, restricted: bool) -> String {
        if restricted {
            format!("{}-{} characters ({}, restricted)", self.min, self.max, self.charset)
        } else {
            format!("{}-{} characters ({})", self.min, self.max, self.charset)
        }
    }
}
