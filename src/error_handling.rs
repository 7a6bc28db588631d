//! Error type definitions.
//!
//! Every fatal condition in a visit maps to one [`VisitError`] variant.
//! Nothing below `main` terminates the process: errors are bubbled with `?`
//! to the binary, which prints the message and exits non-zero.

use std::net::SocketAddr;
use std::time::Duration;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Fatal conditions for a visit.
///
/// The taxonomy follows the diagnostic-first design: transport failures are
/// never retried, and everything that happens before a response is obtained
/// is fatal. Recoverable conditions (a malformed `-H` entry, a redirect
/// without `Location`) never surface here.
#[derive(Error, Debug)]
pub enum VisitError {
    /// The configured method is not one of the standard HTTP methods.
    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// The target URL could not be parsed.
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The raw URL as supplied.
        url: String,
        /// Parser failure detail.
        source: url::ParseError,
    },

    /// The target URL has a scheme other than http or https.
    #[error("Unsupported scheme {scheme:?} in URL {url:?}")]
    UnsupportedScheme {
        /// The raw URL as supplied.
        url: String,
        /// The offending scheme.
        scheme: String,
    },

    /// The target URL has no host component.
    #[error("URL has no host: {url:?}")]
    MissingHost {
        /// The offending URL.
        url: String,
    },

    /// The request head could not be assembled for dispatch.
    #[error("Failed to build request for {url}: {source}")]
    Request {
        /// URL the request was being built for.
        url: String,
        /// Head construction failure detail.
        source: http::Error,
    },

    /// DNS resolution failed.
    #[error("DNS lookup failed for {host}: {source}")]
    Dns {
        /// Hostname that failed to resolve.
        host: String,
        /// Resolver failure detail.
        source: hickory_resolver::error::ResolveError,
    },

    /// DNS resolution succeeded but returned no usable address.
    #[error("No address records found for {host}")]
    NoAddress {
        /// Hostname with an empty answer set.
        host: String,
    },

    /// TCP connect failed.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        /// Address that refused or dropped the connection attempt.
        addr: SocketAddr,
        /// Socket-level failure detail.
        source: std::io::Error,
    },

    /// Name resolution plus TCP connect exceeded the dial timeout.
    #[error("Dial timeout after {timeout:?} connecting to {host}")]
    DialTimeout {
        /// Hostname being dialed.
        host: String,
        /// The fixed dial timeout that elapsed.
        timeout: Duration,
    },

    /// The host is not usable as a TLS server name.
    #[error("Invalid TLS server name {host:?}: {source}")]
    ServerName {
        /// The offending hostname.
        host: String,
        /// Name validation failure detail.
        source: rustls::pki_types::InvalidDnsNameError,
    },

    /// TLS handshake failed.
    #[error("TLS handshake failed for {host}: {source}")]
    TlsHandshake {
        /// Hostname presented during the handshake.
        host: String,
        /// Handshake failure detail.
        source: std::io::Error,
    },

    /// TLS handshake exceeded its timeout.
    #[error("TLS handshake timeout after {timeout:?} for {host}")]
    TlsHandshakeTimeout {
        /// Hostname presented during the handshake.
        host: String,
        /// The fixed handshake timeout that elapsed.
        timeout: Duration,
    },

    /// The HTTP/1.1 connection could not be set up over the stream.
    #[error("HTTP handshake failed: {source}")]
    HttpHandshake {
        /// Protocol failure detail.
        source: hyper::Error,
    },

    /// Sending the request or reading the response head failed.
    #[error("Request to {url} failed: {source}")]
    Dispatch {
        /// URL of the hop that failed.
        url: String,
        /// Protocol or write failure detail.
        source: hyper::Error,
    },

    /// Reading the response body failed; truncated output would mislead.
    #[error("Failed to read response body: {source}")]
    Body {
        /// Body stream failure detail.
        source: hyper::Error,
    },

    /// A `Location` header was present but could not be used.
    #[error("Unusable redirect location {location:?}: {detail}")]
    InvalidLocation {
        /// The `Location` value as received (lossy if not UTF-8).
        location: String,
        /// Why it could not be followed.
        detail: String,
    },

    /// The redirect chain exceeded the configured maximum.
    #[error("Maximum redirects ({max}) exceeded")]
    RedirectLimit {
        /// The configured redirect cap.
        max: u32,
    },

    /// Writing to standard output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
