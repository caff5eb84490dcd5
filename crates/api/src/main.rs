//! `securecipher-api` — HTTP service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Build the [`CipherFactory`] and check every configured key.
//! 4. Build the Axum router and serve plain HTTP or TLS until shutdown.
//! 5. Flush telemetry.

mod config;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use cipher_core::{CipherFactory, CipherService};
use tracing::{info, warn};

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        tls = cfg.tls_paths().is_some(),
        "securecipher-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cipher factory
    // -----------------------------------------------------------------------
    let mut factory = CipherFactory::new(Arc::new(cfg.key_provider()));
    if let Some(ttl) = cfg.fernet_ttl() {
        factory = factory.with_fernet_ttl(ttl);
    }
    let ready = factory
        .preflight()
        .context("a configured cipher key is unusable")?;
    if ready.is_empty() {
        warn!("no cipher keys configured; every encrypt and decrypt request will fail");
    }
    let ready: Vec<&str> = ready.iter().map(|a| a.as_str()).collect();
    info!(algorithms = ?ready, "cipher keys loaded");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(
        CipherService::new(factory),
        cfg.default_crypto_type.clone(),
        cfg.min_text_length,
    );
    let router = server::router::build(state, cfg.request_timeout());

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    match cfg.tls_paths() {
        Some((cert_path, key_path)) => {
            let tls = server::tls::load_server_config(cert_path, key_path)?;
            server::tls::serve(listener, router, tls, server::shutdown_signal()).await?;
        }
        None => {
            axum::serve(listener, router)
                .with_graceful_shutdown(server::shutdown_signal())
                .await
                .context("HTTP server error")?;
        }
    }

    // -----------------------------------------------------------------------
    // 5. Shutdown
    // -----------------------------------------------------------------------
    info!("securecipher-api stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}
