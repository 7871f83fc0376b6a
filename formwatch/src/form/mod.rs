//! Reactive form: fields, validation engine and derived state.
//!
//! Data flows one way: a value change goes to the [`ValidationEngine`],
//! which publishes a [`FieldOutcome`]. Outcomes feed the per-field
//! [`DisplayState`] and the [`GroupValidity`], which has its own display
//! state. Nothing reads back from presentation.

mod controller;
mod engine;
mod field;
mod group;
mod presentation;
mod snapshot;

pub use controller::FormController;
pub use engine::{FAULT_MESSAGE, ValidationEngine};
pub use field::{FieldId, FieldOutcome, FieldState};
pub use group::{GroupValidity, recompute};
pub use presentation::{DisplayKind, DisplayState, field_display, group_display};
pub use snapshot::{FormSnapshot, Submission, SubmissionInfo};
