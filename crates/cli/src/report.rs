//! Validate one booking request and write the result.

use std::io::Write;

use booking_core::booking::{validate_with_clock, FieldValues, ValidationErrors};
use booking_core::clock::Clock;

use crate::config::OutputFormat;

/// Process exit status for a request whose fields all pass.
pub const EXIT_VALID: i32 = 0;

/// Process exit status for a request with at least one failing field.
pub const EXIT_INVALID: i32 = 1;

/// Process exit status for malformed input or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Parse `input` as a booking request, validate it, and write the result.
///
/// Returns the validation errors so the caller can pick an exit status.
pub fn run(
    input: &str,
    clock: &dyn Clock,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<ValidationErrors> {
    let values = FieldValues::from_json(input)?;
    let errors = validate_with_clock(&values, clock);
    write_errors(&errors, format, out)?;
    Ok(errors)
}

/// Exit status gating submission on an empty error map.
pub fn exit_code(errors: &ValidationErrors) -> i32 {
    if errors.is_empty() {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

fn write_errors(
    errors: &ValidationErrors,
    format: OutputFormat,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, errors)?;
            writeln!(out)
        }
        OutputFormat::Text if errors.is_empty() => writeln!(out, "ok"),
        OutputFormat::Text => {
            for (field, message) in errors.iter() {
                writeln!(out, "{field}: {message}")?;
            }
            Ok(())
        }
    }
}
