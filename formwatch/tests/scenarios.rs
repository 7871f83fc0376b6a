//! End-to-end behavior of the company-info form.

use std::sync::{Arc, Mutex};

use formwatch::form::FAULT_MESSAGE;
use formwatch::prelude::*;

fn record<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |value: &T| sink.lock().unwrap().push(value.clone()))
}

#[test]
fn test_valid_name() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::Name, "ValidTeam01");

    assert_eq!(form.outcome(FieldId::Name), FieldOutcome::Valid);
    assert_eq!(form.display_state(FieldId::Name), DisplayState::Success);
}

#[test]
fn test_short_name() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::Name, "Ab");

    assert_eq!(
        form.outcome(FieldId::Name),
        FieldOutcome::invalid("8-44 characters (A-Z, a-z, 0-9)")
    );
    assert_eq!(form.display_state(FieldId::Name), DisplayState::Neutral);
}

#[test]
fn test_restricted_characters() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::LongName, "Team_Name_With_Underscores");

    assert_eq!(
        form.outcome(FieldId::LongName).message(),
        Some("8-255 characters (A-Z, a-z, 0-9, restricted)")
    );
}

#[tokio::test]
async fn test_description_too_long() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::Description, "d".repeat(4001));
    form.settled().await;

    assert!(form.outcome(FieldId::Description).is_invalid());
    assert_eq!(form.group_validity(), GroupValidity::Invalid);
}

#[test]
fn test_empty_long_name_stays_unvalidated() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::LongName, "");

    assert_eq!(form.outcome(FieldId::LongName), FieldOutcome::Unvalidated);
    assert_eq!(form.group_validity(), GroupValidity::Unvalidated);
    assert_eq!(form.group_display(), DisplayState::Warning);
}

#[test]
fn test_clearing_invalid_field_resets_outcome() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::Name, "Ab");
    assert_eq!(form.group_validity(), GroupValidity::Invalid);

    form.on_field_input(FieldId::Name, "");
    assert_eq!(form.outcome(FieldId::Name), FieldOutcome::Unvalidated);
    assert_eq!(form.group_validity(), GroupValidity::Unvalidated);
}

#[test]
fn test_submit_is_passive() {
    let form = FormController::dashboard().unwrap();

    form.on_field_input(FieldId::Name, "Ab");
    form.on_field_input(FieldId::LongName, "A Valid Long Name");

    let snapshot = form.submit();

    assert_eq!(
        snapshot,
        FormSnapshot {
            name: "Ab".into(),
            long_name: "A Valid Long Name".into(),
            description: String::new(),
        }
    );
    assert!(form.outcome(FieldId::Name).is_invalid());
    assert!(form.outcome(FieldId::LongName).is_valid());
}

#[tokio::test]
async fn test_group_follows_fields() {
    let form = FormController::dashboard().unwrap();
    let (validity, on_validity) = record::<GroupValidity>();
    let (display, on_display) = record::<DisplayState>();
    let _a = form.subscribe_group_validity(on_validity);
    let _b = form.subscribe_group_display(on_display);

    form.on_field_input(FieldId::Name, "ValidTeam01");
    form.on_field_input(FieldId::LongName, "Valid Team Long Name");
    form.on_field_input(FieldId::Description, "Builds things.");
    assert_eq!(form.group_validity(), GroupValidity::Unvalidated);

    form.settled().await;
    assert_eq!(form.group_validity(), GroupValidity::Valid);
    assert_eq!(form.group_display(), DisplayState::Success);

    form.on_field_input(FieldId::Name, "Ab");
    assert_eq!(form.group_validity(), GroupValidity::Invalid);
    assert_eq!(form.group_display(), DisplayState::Warning);

    assert_eq!(
        *validity.lock().unwrap(),
        vec![GroupValidity::Valid, GroupValidity::Invalid]
    );
    assert_eq!(
        *display.lock().unwrap(),
        vec![DisplayState::Success, DisplayState::Warning]
    );
}

#[test]
fn test_same_value_twice_is_idempotent() {
    let form = FormController::dashboard().unwrap();
    let (outcomes, on_outcome) = record::<FieldOutcome>();
    let _sub = form.subscribe_outcome(FieldId::Name, on_outcome);

    form.on_field_input(FieldId::Name, "Ab");
    let first = form.outcome(FieldId::Name);
    form.on_field_input(FieldId::Name, "Ab");
    let second = form.outcome(FieldId::Name);

    assert_eq!(first, second);
    assert_eq!(outcomes.lock().unwrap().len(), 1);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let form = FormController::dashboard().unwrap();
    let (outcomes, on_outcome) = record::<FieldOutcome>();
    let sub = form.subscribe_outcome(FieldId::Name, on_outcome);

    form.on_field_input(FieldId::Name, "Ab");
    assert!(sub.unsubscribe());
    form.on_field_input(FieldId::Name, "ValidTeam01");

    assert_eq!(outcomes.lock().unwrap().len(), 1);
}

#[test]
fn test_faulting_validator_never_reaches_caller() {
    struct Flaky;
    impl Validate for Flaky {
        fn validate(&self, _value: &str) -> Verdict {
            Err(ValidatorError::new("lookup failed"))
        }
    }

    let form = FormController::dashboard().unwrap();
    let (faults, on_fault) = record::<ValidatorFault>();
    form.on_fault(on_fault);
    form.set_validators(FieldId::LongName, vec![Validator::sync(Flaky)]);

    form.on_field_input(FieldId::LongName, "Anything at all");

    assert_eq!(
        form.outcome(FieldId::LongName),
        FieldOutcome::invalid(FAULT_MESSAGE)
    );
    let faults = faults.lock().unwrap();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].field, FieldId::LongName);
}

#[test]
fn test_shared_validator_across_fields() {
    let shared = Validator::rule(|v| v.chars().all(|c| c.is_ascii_uppercase()), "Uppercase only");
    let form = FormController::new(&FormConfig::unconstrained()).unwrap();
    form.set_validators(FieldId::Name, vec![shared.clone()]);
    form.set_validators(FieldId::LongName, vec![shared]);

    form.on_field_input(FieldId::Name, "ACME");
    form.on_field_input(FieldId::LongName, "Acme");

    assert!(form.outcome(FieldId::Name).is_valid());
    assert_eq!(form.outcome(FieldId::LongName).message(), Some("Uppercase only"));
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let form = FormController::dashboard().unwrap();
    form.on_field_input(FieldId::LongName, "Long");

    let json = serde_json::to_value(form.snapshot()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "name": "", "longName": "Long", "description": "" })
    );
}
