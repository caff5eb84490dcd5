//! TLS serving using rustls.
//!
//! Enabled when `TLS_CERT_PATH` and `TLS_KEY_PATH` are both configured. Each
//! accepted TCP connection is handshaked with [`TlsAcceptor`] and then served
//! by hyper with the same Axum [`Router`] used for plain HTTP.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use rustls::ServerConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio_rustls::{server::TlsStream, TlsAcceptor};
use tower::ServiceExt;
use tracing::{debug, info, warn};

/// Read PEM files from disk and build a [`rustls::ServerConfig`].
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn load_server_config(cert_path: &str, key_path: &str) -> Result<Arc<ServerConfig>> {
    let cert_pem = std::fs::read(cert_path)
        .with_context(|| format!("failed to read TLS certificate from {cert_path}"))?;
    let key_pem = std::fs::read(key_path)
        .with_context(|| format!("failed to read TLS private key from {key_path}"))?;
    build_server_config(&cert_pem, &key_pem)
}

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private key bytes.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse TLS certificate chain")?;
    if certs.is_empty() {
        anyhow::bail!("no certificates found in PEM data");
    }

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .context("failed to read TLS private key")?
        .context("no private key found in PEM data")?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("failed to build rustls ServerConfig")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

/// TLS handshakes that take longer than this are abandoned.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed `accept()` (e.g. `EMFILE`) before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept loop: terminate TLS on each connection and hand it to `router`.
///
/// When `shutdown` resolves the listener is closed and every open connection
/// is told to finish its in-flight request and close. Returns once all
/// connection tasks have completed.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    config: Arc<ServerConfig>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let acceptor = TlsAcceptor::from(config);
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        let (tcp, peer_addr) = tokio::select! {
            res = listener.accept() => match res {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept error");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                log_join(joined);
                continue;
            }
            _ = &mut shutdown => break,
        };

        let acceptor = acceptor.clone();
        let router = router.clone();
        let stop = stop_rx.clone();
        connections.spawn(async move {
            let stream = match tokio::time::timeout(HANDSHAKE_TIMEOUT, acceptor.accept(tcp)).await {
                Ok(Ok(s)) => s,
                Ok(Err(e)) => {
                    debug!(%peer_addr, error = %e, "TLS handshake failed");
                    return;
                }
                Err(_) => {
                    debug!(%peer_addr, "TLS handshake timed out");
                    return;
                }
            };
            serve_connection(stream, router, stop, peer_addr).await;
        });
    }

    drop(listener);
    info!(open_connections = connections.len(), "TLS listener stopped; draining connections");
    // Receivers observe the change even if they were cloned before the send.
    let _ = stop_tx.send(true);
    while let Some(joined) = connections.join_next().await {
        log_join(joined);
    }
    info!("TLS connections drained");
    Ok(())
}

async fn serve_connection(
    stream: TlsStream<TcpStream>,
    router: Router,
    mut stop: watch::Receiver<bool>,
    peer_addr: SocketAddr,
) {
    let service =
        hyper::service::service_fn(move |req: Request<Incoming>| router.clone().oneshot(req));

    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let result = tokio::select! {
        res = conn.as_mut() => res,
        _ = stop.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };
    if let Err(e) = result {
        debug!(%peer_addr, error = %e, "connection closed with error");
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "connection task failed");
    }
}
