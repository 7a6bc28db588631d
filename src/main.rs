//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `url_timing` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing error reporting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use url_timing::config::DEFAULT_MAX_REDIRECTS;
use url_timing::initialization::{init_crypto_provider, init_logger_with};
use url_timing::{run_visit, Config, LogFormat, LogLevel};

/// Visit a URL and print a phase-by-phase connection timing diagram.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Target URL; the scheme defaults to http when omitted
    url: String,

    /// HTTP method to use for the request
    #[arg(short = 'X', long = "request", default_value = "GET")]
    method: String,

    /// Pass a custom header to the server; repeatable
    #[arg(short = 'H', long = "header", value_name = "KEY: VALUE")]
    headers: Vec<String>,

    /// Include response headers in the output
    #[arg(short = 'i', long)]
    include: bool,

    /// Follow Location headers on redirect responses
    #[arg(short = 'L', long = "location")]
    location: bool,

    /// Maximum number of redirects to follow
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    max_redirects: u32,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    let config = Config {
        method: cli.method,
        headers: cli.headers,
        include_headers: cli.include,
        follow_redirects: cli.location,
        max_redirects: cli.max_redirects,
    };

    match run_visit(config, &cli.url).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("url_timing error: {:#}", anyhow::Error::from(e));
            process::exit(1);
        }
    }
}
