//! `booking-cli` -- validate one booking request.
//!
//! Reads a JSON object with `name`, `date`, `time` and `guests` from stdin
//! and writes the field error map to stdout. The exit status is `0` when
//! every field passes, `1` when any field fails, and `2` on malformed input
//! or configuration.
//!
//! # Environment variables
//!
//! | Variable         | Required | Default | Description                                |
//! |------------------|----------|---------|--------------------------------------------|
//! | `BOOKING_NOW`    | no       | --      | RFC 3339 instant to compare dates against  |
//! | `BOOKING_OUTPUT` | no       | `json`  | `json` or `text`                           |
//! | `RUST_LOG`       | no       | `booking_cli=info,booking_core=info` | Log filter (stderr) |

use std::io::{Read, Write};

use anyhow::Context;
use booking_cli::config::CliConfig;
use booking_cli::report;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_cli=info,booking_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match try_main() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("Booking validation aborted: {err:#}");
            report::EXIT_USAGE
        }
    };
    std::process::exit(code);
}

fn try_main() -> anyhow::Result<i32> {
    let config = CliConfig::from_env()?;
    tracing::debug!(now = ?config.now, output = ?config.output, "Configuration loaded");

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read booking request from stdin")?;

    let clock = config.clock();
    let mut stdout = std::io::stdout().lock();
    let errors = report::run(&input, &*clock, config.output, &mut stdout)?;
    stdout.flush()?;

    tracing::info!(failed = errors.len(), "Booking request validated");
    Ok(report::exit_code(&errors))
}
