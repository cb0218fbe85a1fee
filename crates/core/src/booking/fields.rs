//! Field keys and tagged field inputs.
//!
//! `name` and `time` stay raw text. `date` and `guests` are parsed up front
//! so the parse/validate boundary is explicit: a parse failure is carried as
//! an `Invalid` variant and only turns into an error message during the
//! validation pass.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Field keys
// ---------------------------------------------------------------------------

/// One of the four booking form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Name,
    Date,
    Time,
    Guests,
}

impl FieldKey {
    pub const ALL: [FieldKey; 4] = [Self::Name, Self::Date, Self::Time, Self::Guests];

    /// The key as used in form input names and serialized error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Time => "time",
            Self::Guests => "guests",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// Naive date-time layouts accepted in addition to RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Offset date-time without seconds; RFC 3339 covers the with-seconds form.
const OFFSET_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";

/// Calendar date layout produced by date-picker inputs.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// ISO `YYYY` or `YYYY-MM`, which start on the first day.
static YEAR_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})(?:-([0-9]{2}))?$").expect("valid regex"));

/// Result of parsing the raw `date` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Valid(Timestamp),
    Invalid(String),
}

impl DateInput {
    /// Parse an ISO date or date-time string.
    ///
    /// Date-only forms (`YYYY-MM-DD`, `YYYY-MM`, `YYYY`) are midnight UTC on
    /// the first day they name. Offsets (`Z`, `+HH:MM`) are honored with or
    /// without seconds; naive `YYYY-MM-DDTHH:MM[:SS]` is read as UTC.
    pub fn parse(raw: &str) -> Self {
        parse_iso(raw.trim())
            .map(Self::Valid)
            .unwrap_or_else(|| Self::Invalid(raw.to_string()))
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Valid(ts) => Some(*ts),
            Self::Invalid(_) => None,
        }
    }
}

impl From<Timestamp> for DateInput {
    fn from(ts: Timestamp) -> Self {
        Self::Valid(ts)
    }
}

fn parse_iso(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let with_offset = match s.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{local}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&with_offset, OFFSET_MINUTES_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date = match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            let caps = YEAR_MONTH_RE.captures(s)?;
            let year = caps.get(1)?.as_str().parse().ok()?;
            let month = match caps.get(2) {
                Some(m) => m.as_str().parse().ok()?,
                None => 1,
            };
            NaiveDate::from_ymd_opt(year, month, 1)?
        }
    };
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

// ---------------------------------------------------------------------------
// Guests
// ---------------------------------------------------------------------------

/// Result of interpreting the raw `guests` field as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestsInput {
    Number(f64),
    Invalid(String),
}

impl GuestsInput {
    /// Parse text the way a browser coerces a form value to a number.
    ///
    /// Accepts decimal and exponent notation, an exact signed `Infinity`,
    /// and unsigned `0x`/`0o`/`0b` integers. Other alphabetic spellings
    /// (`inf`, `nan`) and empty text are not numbers.
    pub fn parse(raw: &str) -> Self {
        match parse_number(raw.trim()) {
            Some(n) => Self::Number(n),
            None => Self::Invalid(raw.to_string()),
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Invalid(_) => None,
        }
    }
}

impl From<f64> for GuestsInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for GuestsInput {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// Signed decimal literal with optional fraction and exponent.
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("valid regex")
});

fn parse_number(s: &str) -> Option<f64> {
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    if DECIMAL_RE.is_match(s) {
        s.parse().ok()
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// The four field values for one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    pub name: String,
    pub date: DateInput,
    pub time: String,
    pub guests: GuestsInput,
}

impl FieldValues {
    /// Build from the four raw strings as typed into the form.
    pub fn from_raw(name: &str, date: &str, time: &str, guests: &str) -> Self {
        Self {
            name: name.to_string(),
            date: DateInput::parse(date),
            time: time.to_string(),
            guests: GuestsInput::parse(guests),
        }
    }

    /// Deserialize a JSON object with `name`, `date`, `time`, `guests` keys.
    ///
    /// Missing keys and `null` count as empty text. `guests` may be a JSON
    /// number or a string.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: RawFieldValues =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        Ok(raw.into())
    }
}

/// Wire shape of a booking request before field parsing.
#[derive(Debug, Deserialize)]
struct RawFieldValues {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    guests: Option<RawGuests>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGuests {
    Number(f64),
    Text(String),
}

impl From<RawFieldValues> for FieldValues {
    fn from(raw: RawFieldValues) -> Self {
        let guests = match raw.guests {
            Some(RawGuests::Number(n)) => GuestsInput::Number(n),
            Some(RawGuests::Text(text)) => GuestsInput::parse(&text),
            None => GuestsInput::parse(""),
        };
        Self {
            name: raw.name.unwrap_or_default(),
            date: DateInput::parse(raw.date.as_deref().unwrap_or_default()),
            time: raw.time.unwrap_or_default(),
            guests,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    // -----------------------------------------------------------------------
    // FieldKey
    // -----------------------------------------------------------------------

    #[test]
    fn field_key_parses_input_names() {
        assert_eq!("guests".parse::<FieldKey>().unwrap(), FieldKey::Guests);
        assert_matches!(
            "email".parse::<FieldKey>(),
            Err(CoreError::UnknownField(name)) if name == "email"
        );
    }

    #[test]
    fn field_key_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FieldKey::Time).unwrap(), "\"time\"");
    }

    // -----------------------------------------------------------------------
    // DateInput
    // -----------------------------------------------------------------------

    #[test]
    fn bare_date_is_midnight_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(DateInput::parse("2024-12-31"), DateInput::Valid(expected));
    }

    #[test]
    fn rfc3339_keeps_offset() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(
            DateInput::parse("2025-03-01T10:30:00+02:00"),
            DateInput::Valid(expected)
        );
    }

    #[test]
    fn naive_datetime_is_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap();
        assert_eq!(DateInput::parse("2025-03-01T10:30"), DateInput::Valid(expected));
    }

    #[test]
    fn offset_datetime_without_seconds() {
        let expected = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(DateInput::parse("2030-01-01T10:00Z"), DateInput::Valid(expected));
        assert_eq!(
            DateInput::parse("2030-01-01T12:00+02:00"),
            DateInput::Valid(expected)
        );
    }

    #[test]
    fn year_month_starts_on_the_first() {
        let expected = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(DateInput::parse("2030-06"), DateInput::Valid(expected));
    }

    #[test]
    fn year_only_starts_on_january_first() {
        let expected = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(DateInput::parse("2030"), DateInput::Valid(expected));
    }

    #[test]
    fn out_of_range_month_is_invalid() {
        assert_matches!(DateInput::parse("2030-13"), DateInput::Invalid(_));
        assert_matches!(DateInput::parse("203"), DateInput::Invalid(_));
    }

    #[test]
    fn impossible_calendar_date_is_invalid() {
        assert_matches!(DateInput::parse("2025-02-30"), DateInput::Invalid(_));
    }

    #[test]
    fn empty_and_garbage_dates_are_invalid() {
        assert_eq!(DateInput::parse(""), DateInput::Invalid(String::new()));
        assert_matches!(DateInput::parse("next tuesday"), DateInput::Invalid(_));
    }

    // -----------------------------------------------------------------------
    // GuestsInput
    // -----------------------------------------------------------------------

    #[test]
    fn guests_parse_numbers_and_reject_text() {
        assert_eq!(GuestsInput::parse("4"), GuestsInput::Number(4.0));
        assert_eq!(GuestsInput::parse(" -5 "), GuestsInput::Number(-5.0));
        assert_eq!(GuestsInput::parse("2.5"), GuestsInput::Number(2.5));
        assert_matches!(GuestsInput::parse("abc"), GuestsInput::Invalid(_));
        assert_matches!(GuestsInput::parse(""), GuestsInput::Invalid(_));
    }

    #[test]
    fn guests_reject_non_browser_float_spellings() {
        for text in ["inf", "INF", "infinity", "-inf", "nan", "NaN", "1_000", "4 guests"] {
            assert_matches!(GuestsInput::parse(text), GuestsInput::Invalid(_), "{text:?}");
        }
    }

    #[test]
    fn guests_accept_browser_number_forms() {
        assert_eq!(GuestsInput::parse("Infinity"), GuestsInput::Number(f64::INFINITY));
        assert_eq!(
            GuestsInput::parse("-Infinity"),
            GuestsInput::Number(f64::NEG_INFINITY)
        );
        assert_eq!(GuestsInput::parse("1e2"), GuestsInput::Number(100.0));
        assert_eq!(GuestsInput::parse(".5"), GuestsInput::Number(0.5));
        assert_eq!(GuestsInput::parse("5."), GuestsInput::Number(5.0));
        assert_eq!(GuestsInput::parse("+3"), GuestsInput::Number(3.0));
    }

    #[test]
    fn guests_accept_unsigned_radix_integers() {
        assert_eq!(GuestsInput::parse("0x10"), GuestsInput::Number(16.0));
        assert_eq!(GuestsInput::parse("0o17"), GuestsInput::Number(15.0));
        assert_eq!(GuestsInput::parse("0b101"), GuestsInput::Number(5.0));
        assert_matches!(GuestsInput::parse("-0x10"), GuestsInput::Invalid(_));
        assert_matches!(GuestsInput::parse("0x"), GuestsInput::Invalid(_));
        assert_matches!(GuestsInput::parse("0x1g"), GuestsInput::Invalid(_));
    }

    // -----------------------------------------------------------------------
    // FieldValues
    // -----------------------------------------------------------------------

    #[test]
    fn from_json_accepts_numeric_guests() {
        let values = FieldValues::from_json(
            r#"{"name":"John Doe","date":"2030-01-01","time":"14:00","guests":4}"#,
        )
        .unwrap();
        assert_eq!(values.name, "John Doe");
        assert_eq!(values.guests, GuestsInput::Number(4.0));
        assert_matches!(values.date, DateInput::Valid(_));
    }

    #[test]
    fn from_json_treats_missing_and_null_as_empty() {
        let values = FieldValues::from_json(r#"{"name":null}"#).unwrap();
        assert_eq!(values.name, "");
        assert_eq!(values.time, "");
        assert_matches!(values.date, DateInput::Invalid(_));
        assert_matches!(values.guests, GuestsInput::Invalid(_));
    }

    #[test]
    fn from_json_rejects_non_object() {
        assert_matches!(
            FieldValues::from_json("42"),
            Err(CoreError::InvalidInput(_))
        );
    }
}
