//! Page-level validity across all tracked fields.

use std::collections::BTreeMap;

use super::field::{FieldId, FieldOutcome};

/// Aggregate validity of the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GroupValidity {
    /// No field is invalid and at least one is not yet valid.
    #[default]
    Unvalidated,
    /// Every field is valid.
    Valid,
    /// At least one field is invalid.
    Invalid,
}

impl GroupValidity {
    /// Combine a set of outcomes.
    ///
    /// Any `Invalid` wins; otherwise the group is `Valid` only if every
    /// outcome is `Valid`. An empty set is `Unvalidated`.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a FieldOutcome>,
    {
        let mut seen = false;
        let mut all_valid = true;
        for outcome in outcomes {
            seen = true;
            match outcome {
                FieldOutcome::Invalid { .. } => return Self::Invalid,
                FieldOutcome::Unvalidated => all_valid = false,
                FieldOutcome::Valid => {}
            }
        }
        if seen && all_valid {
            Self::Valid
        } else {
            Self::Unvalidated
        }
    }

    /// Check if the group is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Recompute the group validity from the full outcome map.
pub fn recompute(outcomes: &BTreeMap<FieldId, FieldOutcome>) -> GroupValidity {
    GroupValidity::from_outcomes(outcomes.values())
}
