//! Booking validation pass. Pure logic, no I/O.
//!
//! Four independent rules, one per field. Every rule runs on every call and
//! all failures are returned together.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::fields::{DateInput, FieldKey, FieldValues, GuestsInput};
use super::form::Booking;
use crate::clock::Clock;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const NAME_REQUIRED: &str = "Name is required";
pub const DATE_NOT_FUTURE: &str = "Date must be a valid future date";
pub const TIME_FORMAT: &str = "Time must be in HH:MM format";
pub const GUESTS_NOT_POSITIVE: &str = "Number of guests must be a positive integer";

/// 24-hour `HH:MM`, `00:00` through `23:59`, nothing before or after.
pub const TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):([0-5][0-9])$";

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIME_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Field key to error message for every field that failed its rule.
///
/// Iterates and serializes in field order. Empty means the form may submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldKey, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: FieldKey) -> Option<&'static str> {
        self.0.get(&key).copied()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Pass `checked` through, recording `message` under `key` when absent.
    fn record<T>(
        &mut self,
        key: FieldKey,
        message: &'static str,
        checked: Option<T>,
    ) -> Option<T> {
        if checked.is_none() {
            self.0.insert(key, message);
        }
        checked
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Run all four rules against `values`, comparing dates to `now`.
pub fn validate(values: &FieldValues, now: Timestamp) -> ValidationErrors {
    check(values, now).err().unwrap_or_default()
}

/// Same as [`validate`], reading `now` from `clock` exactly once.
pub fn validate_with_clock(
    values: &FieldValues,
    clock: &(impl Clock + ?Sized),
) -> ValidationErrors {
    validate(values, clock.now())
}

/// Run all four rules and, when none fails, assemble the accepted booking.
///
/// Each rule yields its checked value or records its message, so `Err`
/// always carries at least one error.
pub fn check(values: &FieldValues, now: Timestamp) -> Result<Booking, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = errors.record(FieldKey::Name, NAME_REQUIRED, checked_name(&values.name));
    let date = errors.record(FieldKey::Date, DATE_NOT_FUTURE, future_date(&values.date, now));
    let time = errors.record(FieldKey::Time, TIME_FORMAT, parse_time(&values.time));
    let guests = errors.record(
        FieldKey::Guests,
        GUESTS_NOT_POSITIVE,
        positive_guests(&values.guests),
    );

    tracing::debug!(
        failed = errors.len(),
        now = %now,
        "Booking validation pass complete",
    );

    match (name, date, time, guests) {
        (Some(name), Some(date), Some((hour, minute)), Some(guests)) => Ok(Booking {
            name,
            date,
            hour,
            minute,
            guests,
        }),
        _ => Err(errors),
    }
}

fn checked_name(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

/// Strictly later than `now`; equal is rejected.
fn future_date(date: &DateInput, now: Timestamp) -> Option<Timestamp> {
    date.timestamp().filter(|ts| *ts > now)
}

/// Positive only; fractional counts pass. NaN fails the comparison.
fn positive_guests(guests: &GuestsInput) -> Option<f64> {
    guests.number().filter(|n| *n > 0.0)
}

/// Split a well-formed `HH:MM` into hour and minute.
fn parse_time(time: &str) -> Option<(u8, u8)> {
    let caps = TIME_RE.captures(time)?;
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    Some((hour, minute))
}
