//! Runs a field's validators and publishes the outcome.
//!
//! A run walks the validator list in order and stops at the first
//! failure. Synchronous validators run inline on the caller's thread. At
//! the first asynchronous validator the remainder of the run moves onto
//! a tokio task, and `on_value_changed` returns immediately.
//!
//! Every run is tagged with the generation of the value it checks. When
//! it finishes, the result is dropped if the field has a newer value by
//! then. In-flight runs are never aborted, only ignored.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use super::field::{FieldOutcome, FieldState};
use crate::error::{FaultKind, ValidatorFault, extract_panic_message};
use crate::validation::{Validate, ValidateAsync, ValidationResult, Validator, Verdict};

/// Message published when a validator faults.
pub const FAULT_MESSAGE: &str = "Unable to validate value";

type FaultHook = Arc<dyn Fn(&ValidatorFault) + Send + Sync>;

/// Where the inline part of a run stopped.
enum Inline {
    /// The run finished without suspending.
    Done(FieldOutcome),
    /// The validator at this index is asynchronous.
    Suspended(usize),
}

#[derive(Default)]
struct EngineInner {
    in_flight: AtomicUsize,
    idle: Notify,
    fault_hook: RwLock<Option<FaultHook>>,
}

/// Validation orchestrator shared by every field of a form.
///
/// Cheap to clone; clones share in-flight tracking and the fault hook.
#[derive(Clone, Default)]
pub struct ValidationEngine {
    inner: Arc<EngineInner>,
}

impl ValidationEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a callback that receives every validator fault.
    ///
    /// Replaces any previously installed hook.
    pub fn on_fault<F>(&self, f: F)
    where
        F: Fn(&ValidatorFault) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.inner.fault_hook.write() {
            *guard = Some(Arc::new(f));
        }
    }

    /// Replace a field's validators and revalidate its current value.
    pub fn attach_validators(&self, field: &Arc<FieldState>, validators: Vec<Validator>) {
        log::debug!(
            "Attaching {} validator(s) to '{}'",
            validators.len(),
            field.id()
        );
        field.replace_validators(validators);
        self.on_value_changed(field, field.value());
    }

    /// Record a new value for `field` and validate it.
    ///
    /// Never blocks and never panics because of a validator. If the run
    /// suspends, the outcome is published from a spawned task.
    pub fn on_value_changed(&self, field: &Arc<FieldState>, value: impl Into<String>) {
        let value = value.into();
        let generation = field.begin(value.clone());
        let validators = field.validators();

        if value.is_empty() {
            self.commit(field, generation, FieldOutcome::Unvalidated);
            return;
        }

        match self.run_inline(field, generation, &value, &validators) {
            Inline::Done(outcome) => self.commit(field, generation, outcome),
            Inline::Suspended(index) => {
                self.spawn_remaining(field, generation, value, validators, index)
            }
        }
    }

    /// Number of runs currently suspended on an async validator.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until no run is in flight.
    ///
    /// Returns immediately if nothing is pending. A run that never settles
    /// keeps this pending forever.
    pub async fn settled(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn run_inline(
        &self,
        field: &FieldState,
        generation: u64,
        value: &str,
        validators: &[Validator],
    ) -> Inline {
        for (index, validator) in validators.iter().enumerate() {
            match validator {
                Validator::Sync(rule) => {
                    if let Some(outcome) = self.check_sync(field, generation, rule.as_ref(), value)
                    {
                        return Inline::Done(outcome);
                    }
                }
                Validator::Async(_) => return Inline::Suspended(index),
            }
        }
        Inline::Done(FieldOutcome::Valid)
    }

    fn spawn_remaining(
        &self,
        field: &Arc<FieldState>,
        generation: u64,
        value: String,
        validators: Arc<[Validator]>,
        start: usize,
    ) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("Cannot run async validator for '{}': {}", field.id(), err);
                let outcome = self.fault(field, generation, FaultKind::NoRuntime);
                self.commit(field, generation, outcome);
                return;
            }
        };

        log::debug!(
            "Suspending '{}' generation {} at validator {}",
            field.id(),
            generation,
            start
        );

        let guard = InFlight::enter(&self.inner);
        let engine = self.clone();
        let field = Arc::clone(field);
        handle.spawn(async move {
            let _guard = guard;
            let outcome = engine
                .run_remaining(&field, generation, &value, &validators[start..])
                .await;
            engine.commit(&field, generation, outcome);
        });
    }

    async fn run_remaining(
        &self,
        field: &FieldState,
        generation: u64,
        value: &str,
        validators: &[Validator],
    ) -> FieldOutcome {
        for validator in validators {
            let stop = match validator {
                Validator::Sync(rule) => self.check_sync(field, generation, rule.as_ref(), value),
                Validator::Async(rule) => {
                    let started =
                        panic::catch_unwind(AssertUnwindSafe(|| rule.validate(value.to_string())));
                    let verdict = match started {
                        Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                        Err(panic) => Err(panic),
                    };
                    self.settle(field, generation, verdict)
                }
            };
            if let Some(outcome) = stop {
                return outcome;
            }
        }
        FieldOutcome::Valid
    }

    /// Run one sync validator. `Some` means the run stops here.
    fn check_sync(
        &self,
        field: &FieldState,
        generation: u64,
        rule: &dyn Validate,
        value: &str,
    ) -> Option<FieldOutcome> {
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| rule.validate(value)));
        self.settle(field, generation, verdict)
    }

    fn settle(
        &self,
        field: &FieldState,
        generation: u64,
        verdict: Result<Verdict, Box<dyn Any + Send>>,
    ) -> Option<FieldOutcome> {
        match verdict {
            Ok(Ok(ValidationResult::Passed)) => None,
            Ok(Ok(ValidationResult::Failed { message })) => Some(FieldOutcome::Invalid { message }),
            Ok(Err(err)) => Some(self.fault(field, generation, FaultKind::Error(err))),
            Err(panic) => {
                let message = extract_panic_message(&panic);
                Some(self.fault(field, generation, FaultKind::Panic(message)))
            }
        }
    }

    /// Report a fault unless the run has already been superseded.
    fn fault(&self, field: &FieldState, generation: u64, kind: FaultKind) -> FieldOutcome {
        let fault = ValidatorFault {
            field: field.id(),
            generation,
            kind,
        };
        if field.generation() != generation {
            log::debug!("Ignoring fault from stale run: {}", fault);
            return FieldOutcome::invalid(FAULT_MESSAGE);
        }
        log::warn!("Validator fault: {}", fault);

        let hook = self
            .inner
            .fault_hook
            .read()
            .ok()
            .and_then(|guard| guard.clone());
        if let Some(hook) = hook {
            hook(&fault);
        }

        FieldOutcome::invalid(FAULT_MESSAGE)
    }

    fn commit(&self, field: &FieldState, generation: u64, outcome: FieldOutcome) {
        let latest = field.generation();
        if field.publish(generation, outcome.clone()) {
            log::debug!(
                "'{}' generation {} -> {:?}",
                field.id(),
                generation,
                outcome
            );
        } else {
            log::debug!(
                "Discarding stale run for '{}' (generation {} superseded by {})",
                field.id(),
                generation,
                latest
            );
        }
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

/// Counts a spawned run until it is dropped.
struct InFlight(Arc<EngineInner>);

impl InFlight {
    fn enter(inner: &Arc<EngineInner>) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(inner))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}
