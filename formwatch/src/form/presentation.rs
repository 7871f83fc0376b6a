//! Display state derived from validation outcomes.

use super::field::FieldOutcome;
use super::group::GroupValidity;

/// Presentation tag for a status icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayState {
    /// Nothing to report yet.
    #[default]
    Neutral,
    /// Needs attention.
    Warning,
    /// Valid.
    Success,
}

impl DisplayState {
    /// Icon class for this state.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Neutral => "oj-icon-color-disabled",
            Self::Warning => "oj-icon-color-warning",
            Self::Success => "oj-icon-color-success",
        }
    }
}

/// Which mapping table to apply.
///
/// Fields and the group agree on `Success` but degrade differently: a
/// field with no valid value shows nothing, while the group asks for
/// attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    /// A single field.
    Field,
    /// The page-level aggregate.
    Group,
}

impl DisplayKind {
    /// Map a validity flag to a display state.
    pub fn display(self, valid: bool) -> DisplayState {
        match (self, valid) {
            (_, true) => DisplayState::Success,
            (Self::Field, false) => DisplayState::Neutral,
            (Self::Group, false) => DisplayState::Warning,
        }
    }
}

/// Display state for a field outcome.
pub fn field_display(outcome: &FieldOutcome) -> DisplayState {
    DisplayKind::Field.display(outcome.is_valid())
}

/// Display state for the group validity.
pub fn group_display(validity: &GroupValidity) -> DisplayState {
    DisplayKind::Group.display(validity.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mapping() {
        assert_eq!(field_display(&FieldOutcome::Valid), DisplayState::Success);
        assert_eq!(field_display(&FieldOutcome::Unvalidated), DisplayState::Neutral);
        assert_eq!(field_display(&FieldOutcome::invalid("x")), DisplayState::Neutral);
    }

    #[test]
    fn test_group_mapping() {
        assert_eq!(group_display(&GroupValidity::Valid), DisplayState::Success);
        assert_eq!(group_display(&GroupValidity::Unvalidated), DisplayState::Warning);
        assert_eq!(group_display(&GroupValidity::Invalid), DisplayState::Warning);
    }

    #[test]
    fn test_icon_classes() {
        assert_eq!(DisplayState::Neutral.icon_class(), "oj-icon-color-disabled");
        assert_eq!(DisplayState::Warning.icon_class(), "oj-icon-color-warning");
        assert_eq!(DisplayState::Success.icon_class(), "oj-icon-color-success");
    }
}
