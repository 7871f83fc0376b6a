//! Form configuration types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::form::FieldId;
use crate::validation::{
    ALPHANUMERIC_PATTERN, Constraint, Validator, async_length, length_pattern,
};

/// Default short-name bounds.
pub const NAME_LENGTH: (usize, usize) = (8, 44);
/// Default long-name bounds.
pub const LONG_NAME_LENGTH: (usize, usize) = (8, 255);
/// Default description limit.
pub const DESCRIPTION_MAX: usize = 4000;

/// Declarative description of one validator.
///
/// Bounds are signed so that negative input from a config file is
/// reported as [`ConfigError::NegativeBound`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Synchronous length bounds with an optional whole-value pattern.
    LengthPattern {
        /// Minimum length in characters.
        min: i64,
        /// Maximum length in characters.
        max: i64,
        /// Regex the value must match.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        /// Charset description for messages.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        charset: Option<String>,
    },
    /// Asynchronous max-length check.
    AsyncLength {
        /// Maximum length in characters.
        max: i64,
    },
}

impl RuleConfig {
    /// Length bounds with an optional pattern.
    pub fn length_pattern(min: usize, max: usize, pattern: Option<&str>) -> Self {
        Self::LengthPattern {
            min: signed(min),
            max: signed(max),
            pattern: pattern.map(str::to_string),
            charset: None,
        }
    }

    /// Asynchronous max-length check.
    pub fn async_length(max: usize) -> Self {
        Self::AsyncLength { max: signed(max) }
    }

    /// Build the validator this rule describes.
    pub fn build(&self) -> Result<Validator, ConfigError> {
        match self {
            Self::LengthPattern {
                min,
                max,
                pattern,
                charset,
            } => {
                let mut constraint = Constraint::new(unsigned("min", *min)?, unsigned("max", *max)?);
                if let Some(pattern) = pattern {
                    constraint = constraint.with_pattern(pattern.clone());
                }
                if let Some(charset) = charset {
                    constraint = constraint.with_charset(charset.clone());
                }
                length_pattern(constraint)
            }
            Self::AsyncLength { max } => async_length(unsigned("max", *max)?),
        }
    }
}

fn signed(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn unsigned(bound: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeBound { bound, value })
}

/// Validator rules for every field of the form.
///
/// The default is the company-info page: name 8-44 and long name 8-255
/// (letters, digits, spaces, hyphens), description at most 4000
/// characters checked asynchronously.
///
/// # Example
///
/// ```
/// use formwatch::config::{FormConfig, RuleConfig};
/// use formwatch::form::FieldId;
///
/// let config = FormConfig::default()
///     .with_rules(FieldId::Description, vec![RuleConfig::async_length(500)]);
/// assert_eq!(config.rules(FieldId::Description).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    /// Rules for the short name.
    pub name: Vec<RuleConfig>,
    /// Rules for the long name.
    pub long_name: Vec<RuleConfig>,
    /// Rules for the description.
    pub description: Vec<RuleConfig>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name: vec![RuleConfig::length_pattern(
                NAME_LENGTH.0,
                NAME_LENGTH.1,
                Some(ALPHANUMERIC_PATTERN),
            )],
            long_name: vec![RuleConfig::length_pattern(
                LONG_NAME_LENGTH.0,
                LONG_NAME_LENGTH.1,
                Some(ALPHANUMERIC_PATTERN),
            )],
            description: vec![RuleConfig::async_length(DESCRIPTION_MAX)],
        }
    }
}

impl FormConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with no rules at all.
    pub fn unconstrained() -> Self {
        Self {
            name: Vec::new(),
            long_name: Vec::new(),
            description: Vec::new(),
        }
    }

    /// Parse a JSON document. Missing fields keep their default rules.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the rules for one field.
    pub fn with_rules(mut self, field: FieldId, rules: Vec<RuleConfig>) -> Self {
        *self.rules_mut(field) = rules;
        self
    }

    /// Get the rules for one field.
    pub fn rules(&self, field: FieldId) -> &[RuleConfig] {
        match field {
            FieldId::Name => &self.name,
            FieldId::LongName => &self.long_name,
            FieldId::Description => &self.description,
        }
    }

    /// Build the validators for one field, in declaration order.
    pub fn validators(&self, field: FieldId) -> Result<Vec<Validator>, ConfigError> {
        self.rules(field).iter().map(RuleConfig::build).collect()
    }

    fn rules_mut(&mut self, field: FieldId) -> &mut Vec<RuleConfig> {
        match field {
            FieldId::Name => &mut self.name,
            FieldId::LongName => &mut self.long_name,
            FieldId::Description => &mut self.description,
        }
    }
}
