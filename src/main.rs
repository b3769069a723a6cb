//! Provider binary started by the host.
//!
//! Listens on `DOKPLOY_PROVIDER_ADDR` when set, otherwise on an ephemeral
//! port on `127.0.0.1`.

use std::net::SocketAddr;

use dokploy_provider::{init_logging, serve, serve_on, DokployProvider};
use tracing::info;

const ADDR_ENV: &str = "DOKPLOY_PROVIDER_ADDR";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Dokploy provider");

    let provider = DokployProvider::new();
    match std::env::var(ADDR_ENV).ok().filter(|a| !a.trim().is_empty()) {
        Some(addr) => {
            let addr: SocketAddr = addr
                .trim()
                .parse()
                .map_err(|e| format!("invalid {} '{}': {}", ADDR_ENV, addr, e))?;
            serve_on(provider, addr).await
        }
        None => serve(provider).await,
    }
}
