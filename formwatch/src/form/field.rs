//! Per-field state: raw value, generation and published outcome.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::signal::Signal;
use crate::validation::Validator;

/// Identifies one of the tracked text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    /// Short name.
    Name,
    /// Long name.
    LongName,
    /// Free-form description.
    Description,
}

impl FieldId {
    /// Every tracked field, in page order.
    pub const ALL: [FieldId; 3] = [FieldId::Name, FieldId::LongName, FieldId::Description];

    /// Stable string key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LongName => "longName",
            Self::Description => "description",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::LongName => 1,
            Self::Description => 2,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validity verdict for a field's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Not validated yet, or the value is empty.
    #[default]
    Unvalidated,
    /// Every validator passed.
    Valid,
    /// The first failing validator's message.
    Invalid {
        /// Message shown to the user.
        message: String,
    },
}

impl FieldOutcome {
    /// Create an invalid outcome.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Check if the outcome is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if the outcome is invalid.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Get the failure message (if any).
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Invalid { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FieldInner {
    value: String,
    /// Bumped on every new value; runs compare against it before publishing.
    generation: u64,
}

/// One tracked field.
///
/// The value and generation change together under one lock. The
/// validator list is an `Arc<[Validator]>` swapped whole, so a run that
/// grabbed the old list keeps a consistent view of it.
pub struct FieldState {
    id: FieldId,
    inner: RwLock<FieldInner>,
    validators: RwLock<Arc<[Validator]>>,
    outcome: Signal<FieldOutcome>,
}

impl FieldState {
    /// Create an empty, unvalidated field with no validators.
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            inner: RwLock::new(FieldInner::default()),
            validators: RwLock::new(Arc::from(Vec::new())),
            outcome: Signal::new(FieldOutcome::Unvalidated),
        }
    }

    /// The field's identifier.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Get a clone of the current raw value
    pub fn value(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().value.clone())
    }

    /// Generation of the current value.
    pub fn generation(&self) -> u64 {
        self.inner
            .read()
            .map(|guard| guard.generation)
            .unwrap_or_else(|poisoned| poisoned.into_inner().generation)
    }

    /// Last published outcome.
    pub fn outcome(&self) -> FieldOutcome {
        self.outcome.get()
    }

    /// The outcome signal, for subscribing.
    pub fn outcome_signal(&self) -> &Signal<FieldOutcome> {
        &self.outcome
    }

    /// Current validator list.
    pub fn validators(&self) -> Arc<[Validator]> {
        self.validators
            .read()
            .map(|guard| Arc::clone(&*guard))
            .unwrap_or_else(|poisoned| Arc::clone(&*poisoned.into_inner()))
    }

    pub(crate) fn replace_validators(&self, validators: Vec<Validator>) {
        let next: Arc<[Validator]> = Arc::from(validators);
        let mut guard = self
            .validators
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
    }

    /// Store a new value and return its generation.
    pub(crate) fn begin(&self, value: String) -> u64 {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.generation += 1;
        guard.value = value;
        guard.generation
    }

    /// Publish the result of the run tagged `generation`.
    ///
    /// Returns `false` if the run was superseded by a newer value.
    pub(crate) fn publish(&self, generation: u64, outcome: FieldOutcome) -> bool {
        if generation != self.generation() {
            return false;
        }
        self.outcome.publish_at(generation, outcome)
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("id", &self.id)
            .field("value", &self.value())
            .field("generation", &self.generation())
            .field("outcome", &self.outcome())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_bumps_generation() {
        let field = FieldState::new(FieldId::Name);
        assert_eq!(field.generation(), 0);
        assert_eq!(field.begin("a".into()), 1);
        assert_eq!(field.begin("b".into()), 2);
        assert_eq!(field.value(), "b");
    }

    #[test]
    fn test_publish_discards_superseded_generation() {
        let field = FieldState::new(FieldId::LongName);
        let first = field.begin("first".into());
        let second = field.begin("second".into());

        assert!(!field.publish(first, FieldOutcome::invalid("old")));
        assert_eq!(field.outcome(), FieldOutcome::Unvalidated);

        assert!(field.publish(second, FieldOutcome::Valid));
        assert_eq!(field.outcome(), FieldOutcome::Valid);
    }

    #[test]
    fn test_replace_validators_is_whole() {
        let field = FieldState::new(FieldId::Description);
        let before = field.validators();
        field.replace_validators(vec![
            Validator::rule(|_| true, "a"),
            Validator::rule(|_| true, "b"),
        ]);
        assert_eq!(before.len(), 0);
        assert_eq!(field.validators().len(), 2);
    }

    #[test]
    fn test_field_id_keys() {
        let keys: Vec<_> = FieldId::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(keys, vec!["name", "longName", "description"]);
        assert_eq!(FieldId::Description.index(), 2);
    }
}
