//! Booking form: field inputs, validation pass, and form state.
//!
//! Validation failures are data, never `Err`. A field key is present in
//! [`ValidationErrors`] only while that field fails its rule.

pub mod fields;
pub mod form;
pub mod validator;

pub use fields::{DateInput, FieldKey, FieldValues, GuestsInput};
pub use form::{Booking, BookingForm, SubmitOutcome};
pub use validator::{check, validate, validate_with_clock, ValidationErrors};
