//! url_timing library: instrumented single-request HTTP timing
//!
//! This library issues one HTTP request while instrumenting the connection
//! lifecycle (DNS lookup, TCP connect, TLS handshake, first response byte)
//! and renders the captured timings as an ASCII waterfall diagram. Redirects
//! can be followed manually up to a configured cap, with a fresh trace and
//! diagram per hop.
//!
//! # Example
//!
//! ```no_run
//! use url_timing::{run_visit, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     include_headers: true,
//!     follow_redirects: true,
//!     ..Default::default()
//! };
//!
//! run_visit(config, "example.com").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call [`run_visit`] from within an async context.

#![warn(missing_docs)]

pub mod config;
mod connect;
mod error_handling;
mod headers;
pub mod initialization;
mod methods;
mod printer;
pub mod trace;
mod urls;
mod visitor;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{InitializationError, VisitError};
pub use run::run_visit;
pub use urls::normalize_raw_url;
pub use visitor::Visitor;

// Internal run module (drives one visit end to end)
mod run {
    use crate::config::Config;
    use crate::error_handling::VisitError;
    use crate::urls::normalize_raw_url;
    use crate::visitor::Visitor;

    /// Performs one full visit: normalize the raw URL, issue the request,
    /// and print the per-hop timing reports.
    ///
    /// This is the main entry point for the library. The configured method
    /// is validated before the URL is parsed, so a bad method wins when both
    /// inputs are invalid.
    ///
    /// # Errors
    ///
    /// Returns a [`VisitError`] for every fatal condition: invalid method,
    /// unparseable URL, transport or dispatch failure, and an exhausted
    /// redirect cap.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use url_timing::{run_visit, Config};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// run_visit(Config::default(), "http://example.com/").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_visit(config: Config, raw_url: &str) -> Result<(), VisitError> {
        let mut visitor = Visitor::new(config)?;
        let url = normalize_raw_url(raw_url)?;
        visitor.visit(url).await
    }
}
