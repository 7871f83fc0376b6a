//! The form's orchestration root.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use super::engine::ValidationEngine;
use super::field::{FieldId, FieldOutcome, FieldState};
use super::group::{GroupValidity, recompute};
use super::presentation::{DisplayState, field_display, group_display};
use super::snapshot::FormSnapshot;
use crate::config::FormConfig;
use crate::error::{ConfigError, ValidatorFault};
use crate::signal::{Signal, Subscription};
use crate::validation::Validator;

struct FormInner {
    fields: [Arc<FieldState>; 3],
    displays: [Signal<DisplayState>; 3],
    group: Signal<GroupValidity>,
    group_display: Signal<DisplayState>,
    engine: ValidationEngine,
}

impl FormInner {
    fn field(&self, id: FieldId) -> &Arc<FieldState> {
        &self.fields[id.index()]
    }

    fn outcomes(&self) -> BTreeMap<FieldId, FieldOutcome> {
        self.fields
            .iter()
            .map(|field| (field.id(), field.outcome()))
            .collect()
    }

    /// Read the outcomes and store the aggregate under the group's write
    /// lock. Fields publishing from different threads therefore cannot
    /// leave a result computed from an older snapshot in place.
    fn recompute_group(&self) {
        let mut validity = GroupValidity::Unvalidated;
        let changed = self.group.update(|current| {
            *current = recompute(&self.outcomes());
            validity = *current;
        });
        if changed {
            log::debug!("Group validity -> {:?}", validity);
        }
    }
}

/// Owns the form's fields and wires them together.
///
/// Each field's outcome drives its display state and the group validity;
/// the group validity drives the group display state. All of it is
/// observable through `subscribe_*`. Cloning is cheap and clones share
/// the same form.
///
/// # Example
///
/// ```
/// use formwatch::form::{DisplayState, FieldId, FieldOutcome, FormController};
///
/// let form = FormController::dashboard()?;
/// form.on_field_input(FieldId::Name, "ValidTeam01");
/// assert_eq!(form.outcome(FieldId::Name), FieldOutcome::Valid);
/// assert_eq!(form.display_state(FieldId::Name), DisplayState::Success);
///
/// form.on_field_input(FieldId::LongName, "Ab");
/// let snapshot = form.submit();
/// assert_eq!(snapshot.long_name, "Ab");
/// # Ok::<(), formwatch::error::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct FormController {
    inner: Arc<FormInner>,
}

impl FormController {
    /// Build a form from `config`.
    ///
    /// Every validator is constructed before any field exists, so a bad
    /// rule fails here and never mid-validation.
    pub fn new(config: &FormConfig) -> Result<Self, ConfigError> {
        let name = config.validators(FieldId::Name)?;
        let long_name = config.validators(FieldId::LongName)?;
        let description = config.validators(FieldId::Description)?;

        let inner = Arc::new_cyclic(|weak: &Weak<FormInner>| {
            let fields = FieldId::ALL.map(|id| Arc::new(FieldState::new(id)));
            let displays = fields
                .each_ref()
                .map(|field| field.outcome_signal().map(field_display));

            for field in &fields {
                let form = weak.clone();
                let _ = field.outcome_signal().subscribe(move |_| {
                    if let Some(form) = form.upgrade() {
                        form.recompute_group();
                    }
                });
            }

            let group = Signal::new(GroupValidity::Unvalidated);
            let group_display = group.map(group_display);

            FormInner {
                fields,
                displays,
                group,
                group_display,
                engine: ValidationEngine::new(),
            }
        });

        let form = Self { inner };
        for (id, validators) in FieldId::ALL.into_iter().zip([name, long_name, description]) {
            form.set_validators(id, validators);
        }
        Ok(form)
    }

    /// Build the company-info form with its default rules.
    pub fn dashboard() -> Result<Self, ConfigError> {
        Self::new(&FormConfig::default())
    }

    /// Feed a new raw value from the binding layer.
    pub fn on_field_input(&self, field: FieldId, value: impl Into<String>) {
        let state = self.inner.field(field);
        self.inner.engine.on_value_changed(state, value);
    }

    /// Replace a field's validators and revalidate its current value.
    pub fn set_validators(&self, field: FieldId, validators: Vec<Validator>) {
        let state = self.inner.field(field);
        self.inner.engine.attach_validators(state, validators);
    }

    /// Install a callback that receives every validator fault.
    pub fn on_fault<F>(&self, f: F)
    where
        F: Fn(&ValidatorFault) + Send + Sync + 'static,
    {
        self.inner.engine.on_fault(f);
    }

    /// Subscribe to a field's outcome.
    pub fn subscribe_outcome<F>(&self, field: FieldId, f: F) -> Subscription
    where
        F: Fn(&FieldOutcome) + Send + Sync + 'static,
    {
        self.inner.field(field).outcome_signal().subscribe(f)
    }

    /// Subscribe to a field's display state.
    pub fn subscribe_display_state<F>(&self, field: FieldId, f: F) -> Subscription
    where
        F: Fn(&DisplayState) + Send + Sync + 'static,
    {
        self.inner.displays[field.index()].subscribe(f)
    }

    /// Subscribe to the group validity.
    pub fn subscribe_group_validity<F>(&self, f: F) -> Subscription
    where
        F: Fn(&GroupValidity) + Send + Sync + 'static,
    {
        self.inner.group.subscribe(f)
    }

    /// Subscribe to the group display state.
    pub fn subscribe_group_display<F>(&self, f: F) -> Subscription
    where
        F: Fn(&DisplayState) + Send + Sync + 'static,
    {
        self.inner.group_display.subscribe(f)
    }

    /// A field's current raw value.
    pub fn value(&self, field: FieldId) -> String {
        self.inner.field(field).value()
    }

    /// A field's last published outcome.
    pub fn outcome(&self, field: FieldId) -> FieldOutcome {
        self.inner.field(field).outcome()
    }

    /// A field's display state.
    pub fn display_state(&self, field: FieldId) -> DisplayState {
        self.inner.displays[field.index()].get()
    }

    /// The group validity.
    pub fn group_validity(&self) -> GroupValidity {
        self.inner.group.get()
    }

    /// The group display state.
    pub fn group_display(&self) -> DisplayState {
        self.inner.group_display.get()
    }

    /// Access a field's state directly.
    pub fn field(&self, field: FieldId) -> &FieldState {
        self.inner.field(field)
    }

    /// Capture the current raw values. Has no side effects.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            name: self.value(FieldId::Name),
            long_name: self.value(FieldId::LongName),
            description: self.value(FieldId::Description),
        }
    }

    /// Capture the current raw values for submission.
    ///
    /// Submission is passive: it does not force validation and succeeds
    /// whatever the field outcomes are.
    pub fn submit(&self) -> FormSnapshot {
        let snapshot = self.snapshot();
        log::info!("Form submitted with group validity {:?}", self.group_validity());
        snapshot
    }

    /// Wait until no validation run is in flight.
    pub async fn settled(&self) {
        self.inner.engine.settled().await;
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("fields", &self.inner.fields)
            .field("group", &self.group_validity())
            .finish_non_exhaustive()
    }
}
