//! Environment-driven configuration for `booking-cli`.

use std::str::FromStr;

use booking_core::clock::{Clock, FixedClock, SystemClock};
use booking_core::types::Timestamp;
use chrono::{DateTime, Utc};

/// How the validation result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The error map as a single JSON object.
    #[default]
    Json,
    /// One `field: message` line per error, or `ok`.
    Text,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(ConfigError::Invalid {
                var: "BOOKING_OUTPUT",
                reason: format!("expected `json` or `text`, got `{other}`"),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Instant the clock is pinned to; `None` reads system time.
    pub now: Option<Timestamp>,
    /// Result format (default: `json`).
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default        |
    /// |------------------|----------------|
    /// | `BOOKING_NOW`    | system time    |
    /// | `BOOKING_OUTPUT` | `json`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let now = lookup("BOOKING_NOW")
            .filter(|v| !v.trim().is_empty())
            .map(|v| {
                DateTime::parse_from_rfc3339(v.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| ConfigError::Invalid {
                        var: "BOOKING_NOW",
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        let output = match lookup("BOOKING_OUTPUT") {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => OutputFormat::default(),
        };

        Ok(Self { now, output })
    }

    /// The clock validation should read.
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.now {
            Some(instant) => Box::new(FixedClock(instant)),
            None => Box::new(SystemClock),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.now, None);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn pins_clock_from_rfc3339() {
        let config = CliConfig::from_lookup(lookup(&[
            ("BOOKING_NOW", "2025-06-15T09:30:00+02:00"),
            ("BOOKING_OUTPUT", "TEXT"),
        ]))
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 6, 15, 7, 30, 0).unwrap();
        assert_eq!(config.now, Some(expected));
        assert_eq!(config.clock().now(), expected);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn rejects_malformed_now() {
        assert_matches!(
            CliConfig::from_lookup(lookup(&[("BOOKING_NOW", "tomorrow")])),
            Err(ConfigError::Invalid { var: "BOOKING_NOW", .. })
        );
    }

    #[test]
    fn rejects_unknown_output() {
        let err = CliConfig::from_lookup(lookup(&[("BOOKING_OUTPUT", "yaml")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "BOOKING_OUTPUT is invalid: expected `json` or `text`, got `yaml`"
        );
    }
}
