//! DNS resolver initialization.
//!
//! This module provides functions to initialize the DNS resolver with proper
//! timeout configuration.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_TIMEOUT_SECS;

/// Initializes the DNS resolver for hostname lookups.
///
/// Reads the system resolver configuration (`/etc/resolv.conf` or the
/// platform equivalent) so lookups behave like the rest of the machine, and
/// falls back to the default public configuration when the system one cannot
/// be read. Query timeouts are bounded so a dead DNS server fails the visit
/// quickly instead of hanging it.
///
/// # Returns
///
/// A configured `TokioAsyncResolver` wrapped in `Arc` for sharing across hops.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};
    use hickory_resolver::system_conf::read_system_conf;

    let (config, mut opts) = read_system_conf().unwrap_or_else(|e| {
        log::debug!("Could not read system resolver configuration ({e}); using defaults");
        (ResolverConfig::default(), ResolverOpts::default())
    });

    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2; // fail fast, the visit is a one-shot diagnostic

    Arc::new(TokioAsyncResolver::tokio(config, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_constructs() {
        // Construction must not perform any I/O; lookups happen lazily
        let resolver = init_resolver();
        let _ = Arc::clone(&resolver);
    }
}
