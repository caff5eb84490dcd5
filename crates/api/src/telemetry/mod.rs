//! Structured logging and optional OpenTelemetry trace export.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext, or token text** may appear in any span
//!   attribute or log field. Algorithm names and lengths are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
