//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources a visit
//! needs:
//! - Logger
//! - DNS resolver
//! - TLS connector and crypto provider
//!
//! The resolver and TLS connector are built once per visit and shared across
//! redirect hops; everything else about a hop's connection is per-hop state.

mod logger;
mod resolver;
mod tls;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;
pub use tls::init_tls_connector;

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called
/// before any TLS connections are established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
