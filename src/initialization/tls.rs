//! TLS connector initialization.
//!
//! Builds the client-side TLS configuration used for https hops.

use std::sync::Arc;

use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

/// Builds the shared TLS connector backed by the webpki root certificates.
///
/// The connector is constructed once per visit and reused across redirect
/// hops, so TLS session resumption works along an https redirect chain.
/// `init_crypto_provider` must have installed the process-wide crypto
/// provider before the first handshake.
pub fn init_tls_connector() -> TlsConnector {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
