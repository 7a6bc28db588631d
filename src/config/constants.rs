//! Configuration constants.
//!
//! Fixed operational parameters: transport timeouts, the redirect cap, and
//! the identification header. None of these are tunable from the CLI.

use std::time::Duration;

// Network operation timeouts
/// DNS query timeout in seconds (per attempt, inside the resolver)
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Dial timeout covering name resolution plus TCP connect for one hop
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// TCP keep-alive interval applied to each established socket
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30 * 60);
/// TLS handshake timeout
pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(60);
/// Idle connection timeout. Hops tear their connection down as soon as the
/// hop finishes, so nothing currently idles long enough to hit this.
#[allow(dead_code)]
pub const IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(60);
/// How long to wait for a `100 Continue` before sending a request body.
/// Requests carry no body, so this is retained as a documented default only.
#[allow(dead_code)]
pub const EXPECT_CONTINUE_TIMEOUT: Duration = Duration::from_secs(1);

// Redirect handling
/// Maximum number of redirect hops to follow unless overridden on the CLI
pub const DEFAULT_MAX_REDIRECTS: u32 = 30;

/// User-Agent header value sent with every request
pub const USER_AGENT: &str = concat!("url_timing/", env!("CARGO_PKG_VERSION"));
