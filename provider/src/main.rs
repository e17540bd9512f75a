//! CRD Provider host driver
//!
//! Reads one JSON request from stdin, serves it and writes the JSON response
//! to stdout. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::Context;
use crd_provider::host::{serve, HostRequest};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure rustls crypto provider before any client is built
    let _ = rustls::crypto::ring::default_provider().install_default();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read request from stdin")?;
    let request: HostRequest = serde_json::from_str(&input).context("Failed to parse request")?;

    info!("Starting CRD Provider ({:?})", request.operation);
    let response = serve(request).await;
    if response.has_errors() {
        warn!("Request finished with {} diagnostic(s)", response.diagnostics.len());
    }

    println!("{}", serde_json::to_string(&response).context("Failed to encode response")?);
    Ok(())
}
