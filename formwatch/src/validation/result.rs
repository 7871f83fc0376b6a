/// Result of running a single validator against a value.
///
/// Failure is data, not an error: a validator that cannot decide returns
/// `Err(ValidatorError)` instead, which the engine treats as a fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// The value satisfies the rule.
    #[default]
    Passed,
    /// The value violates the rule.
    Failed {
        /// Message shown to the user.
        message: String,
    },
}

impl ValidationResult {
    /// Create a failed result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Check if the value passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if the value failed.
    pub fn is_failed(&self) -> bool {
        !self.is_passed()
    }

    /// Get the failure message (if any).
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { message } => Some(message),
        }
    }
}
