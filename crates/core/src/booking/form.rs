//! Booking form state across submit attempts.
//!
//! Holds what the user has typed so far and which errors are on display.
//! Typing never touches the displayed errors; only a submit attempt does.

use serde::Serialize;

use super::fields::{FieldKey, FieldValues};
use super::validator::{check, ValidationErrors};
use crate::clock::Clock;
use crate::error::CoreError;
use crate::types::Timestamp;

/// A booking that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub name: String,
    pub date: Timestamp,
    pub hour: u8,
    pub minute: u8,
    pub guests: f64,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Booking),
    Rejected(ValidationErrors),
}

/// Raw values typed into the form plus the errors currently displayed.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    name: String,
    date: String,
    time: String,
    guests: String,
    errors: ValidationErrors,
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field's raw value.
    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FieldKey::Name => self.name = value,
            FieldKey::Date => self.date = value,
            FieldKey::Time => self.time = value,
            FieldKey::Guests => self.guests = value,
        }
    }

    /// Replace a field's raw value by its input name (`name`, `date`, ...).
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let key: FieldKey = name.parse()?;
        self.set_field(key, value);
        Ok(())
    }

    pub fn field(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Name => &self.name,
            FieldKey::Date => &self.date,
            FieldKey::Time => &self.time,
            FieldKey::Guests => &self.guests,
        }
    }

    /// Parse the current raw values into tagged inputs.
    pub fn values(&self) -> FieldValues {
        FieldValues::from_raw(&self.name, &self.date, &self.time, &self.guests)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, key: FieldKey) -> Option<&'static str> {
        self.errors.get(key)
    }

    /// Run one validation pass over the current values.
    ///
    /// On failure the displayed errors are replaced wholesale. On success
    /// they are left as they were.
    pub fn submit(&mut self, clock: &(impl Clock + ?Sized)) -> SubmitOutcome {
        match check(&self.values(), clock.now()) {
            Ok(booking) => {
                tracing::info!(
                    name = %booking.name,
                    date = %booking.date,
                    guests = booking.guests,
                    "Booking submitted",
                );
                SubmitOutcome::Submitted(booking)
            }
            Err(errors) => {
                tracing::debug!(failed = errors.len(), "Booking submission rejected");
                self.errors = errors.clone();
                SubmitOutcome::Rejected(errors)
            }
        }
    }
}
