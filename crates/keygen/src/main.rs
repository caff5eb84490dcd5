//! `securecipher-keygen` — operator tool entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`](config::Config) from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Generate one key per family and print them to stdout.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use cipher_core::keygen::{generate_all, GeneratedKeys};
use tracing::info;

use config::OutputFormat;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: keygen configuration invalid: {e:#}");
        e
    })?;
    let format = cfg.format()?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Generate
    // -----------------------------------------------------------------------
    let keys = generate_all().context("failed to generate keys")?;
    println!("{}", render(&keys, format)?);
    info!(?format, "generated keys for all algorithms");
    Ok(())
}

fn render(keys: &GeneratedKeys, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Dotenv => Ok(keys.to_dotenv()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(keys).context("failed to serialise keys as JSON")
        }
    }
}
