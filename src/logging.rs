//! Logging setup.
//!
//! All output goes to **stderr**: stdout carries the handshake line the host
//! reads to find the provider's address.
//!
//! The filter is taken from `DOKPLOY_PROVIDER_LOG`, then `RUST_LOG`, and
//! defaults to `info`:
//!
//! ```bash
//! DOKPLOY_PROVIDER_LOG=dokploy_provider=debug ./dokploy-provider
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the provider-specific log filter.
pub const LOG_ENV: &str = "DOKPLOY_PROVIDER_LOG";

/// Filter used when neither variable is set or parses.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    if !try_init_logging() {
        panic!("a global tracing subscriber is already set");
    }
}

/// Initialize the global subscriber, returning `false` if one was already
/// set.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter(|key| std::env::var(key).ok()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}

/// Build the filter from the first variable that holds a valid directive.
fn env_filter<F>(env: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .iter()
        .filter_map(|key| env(key))
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
