//! Property checks for validators and outcomes.

use formwatch::prelude::*;
use proptest::prelude::*;

fn sync_form() -> FormController {
    let config = FormConfig::default().with_rules(
        FieldId::Description,
        vec![RuleConfig::length_pattern(0, 4000, None)],
    );
    FormController::new(&config).unwrap()
}

proptest! {
    #[test]
    fn length_pattern_agrees_with_definition(
        min in 0usize..20,
        span in 0usize..20,
        value in "[a-z0-9_]{0,45}",
    ) {
        let max = min + span;
        let validator =
            LengthPatternValidator::new(Constraint::new(min, max).with_pattern("[a-z0-9]*")).unwrap();
        let len = value.chars().count();
        let expected = value.is_empty() || (min <= len && len <= max && !value.contains('_'));

        prop_assert_eq!(validator.validate(&value).unwrap().is_passed(), expected);
    }

    #[test]
    fn empty_value_is_never_invalid(
        index in 0usize..3,
        prior in "[ -~]{0,60}",
    ) {
        let form = sync_form();
        let field = FieldId::ALL[index];

        form.on_field_input(field, prior);
        form.on_field_input(field, "");

        prop_assert_eq!(form.outcome(field), FieldOutcome::Unvalidated);
        prop_assert!(form.group_validity() != GroupValidity::Invalid);
    }

    #[test]
    fn group_valid_iff_every_field_valid(
        name in "[A-Za-z]{0,12}",
        long_name in "[A-Za-z]{0,12}",
        description in "[A-Za-z]{0,12}",
    ) {
        let form = sync_form();
        form.on_field_input(FieldId::Name, name);
        form.on_field_input(FieldId::LongName, long_name);
        form.on_field_input(FieldId::Description, description);

        let all_valid = FieldId::ALL.iter().all(|id| form.outcome(*id).is_valid());
        let any_invalid = FieldId::ALL.iter().any(|id| form.outcome(*id).is_invalid());

        prop_assert_eq!(form.group_validity() == GroupValidity::Valid, all_valid);
        prop_assert_eq!(form.group_validity() == GroupValidity::Invalid, any_invalid);
    }
}
