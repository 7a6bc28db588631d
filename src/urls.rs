//! URL parsing and normalization.

use url::{ParseError, Url};

use crate::error_handling::VisitError;

/// Parses and normalizes a raw URL string.
///
/// The string is parsed as-is first; `http://` is prefixed only when that
/// parse yields no scheme, so `example.com` and `http://example.com` are
/// equivalent targets. A leading `host:port` (colon followed by digits) is
/// read as an authority rather than a scheme, while a string carrying a
/// real non-http(s) scheme (`mailto:`, `ftp://`) is rejected instead of
/// being reinterpreted. Parse failures and host-less URLs are fatal too.
///
/// # Arguments
///
/// * `raw` - The URL string as supplied on the command line
///
/// # Errors
///
/// Returns `VisitError::InvalidUrl`, `VisitError::UnsupportedScheme`, or
/// `VisitError::MissingHost` when the string cannot be turned into a
/// visitable URL.
pub fn normalize_raw_url(raw: &str) -> Result<Url, VisitError> {
    let trimmed = raw.trim();

    let parsed = match Url::parse(trimmed) {
        Ok(parsed) => {
            if matches!(parsed.scheme(), "http" | "https") {
                parsed
            } else if colon_starts_port(trimmed) {
                parse_with_default_scheme(trimmed, raw)?
            } else {
                return Err(VisitError::UnsupportedScheme {
                    url: raw.to_string(),
                    scheme: parsed.scheme().to_string(),
                });
            }
        }
        Err(ParseError::RelativeUrlWithoutBase) => parse_with_default_scheme(trimmed, raw)?,
        Err(source) => {
            return Err(VisitError::InvalidUrl {
                url: raw.to_string(),
                source,
            })
        }
    };

    ensure_visitable(parsed, raw)
}

/// Checks that a parsed URL is one the visitor can dial: an http or https
/// scheme and a present host. Redirect targets pass through the same gate
/// as command-line targets; `raw` is the string blamed in errors.
pub fn ensure_visitable(parsed: Url, raw: &str) -> Result<Url, VisitError> {
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(VisitError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: other.to_string(),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(VisitError::MissingHost {
            url: raw.to_string(),
        });
    }

    Ok(parsed)
}

fn parse_with_default_scheme(trimmed: &str, raw: &str) -> Result<Url, VisitError> {
    let prefixed = format!("http://{trimmed}");
    Url::parse(&prefixed).map_err(|source| VisitError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

// "host:8080/x" parses with scheme "host"; digits right after the first
// colon mean a port, not a scheme
fn colon_starts_port(s: &str) -> bool {
    match s.split_once(':') {
        Some((_, rest)) => {
            let port_len = rest.chars().take_while(char::is_ascii_digit).count();
            port_len > 0
                && matches!(
                    rest.as_bytes().get(port_len).copied(),
                    None | Some(b'/') | Some(b'?') | Some(b'#')
                )
        }
        None => false,
    }
}
