//! Reactive validation core for a three-field data-entry form.
//!
//! Raw values go in through [`FormController::on_field_input`]. Each field
//! runs its validators (sync inline, async on a tokio task) and publishes a
//! [`FieldOutcome`]. Display states and the page-level [`GroupValidity`] are
//! derived from the outcomes and can be observed through subscriptions.
//!
//! [`FormController::on_field_input`]: form::FormController::on_field_input
//! [`FieldOutcome`]: form::FieldOutcome
//! [`GroupValidity`]: form::GroupValidity

pub mod config;
pub mod error;
pub mod form;
pub mod prelude;
pub mod signal;
pub mod validation;
