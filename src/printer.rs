//! Response presentation on stdout.
//!
//! The status line is printed for every hop, colored by status class.
//! Headers and the body are printed only for the terminal response, with
//! header names restored to their canonical Title-Case form.

use std::io::{self, Write};

use colored::{Color, Colorize};
use http::{HeaderMap, StatusCode, Version};
use http_body_util::BodyExt;
use hyper::body::Incoming;

use crate::error_handling::VisitError;

/// Prints the protocol version and status, for example `HTTP/1.1 200 OK`.
pub fn print_status_line(version: Version, status: StatusCode) {
    let line = format!("{version:?} {status}");
    println!("{}", line.color(status_color(status)));
}

fn status_color(status: StatusCode) -> Color {
    match status.as_u16() {
        200..=299 => Color::Green,
        300..=399 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Prints the response headers, one `Name: value` line each, sorted by name.
///
/// Does nothing unless `include` is set. Repeated headers collapse into one
/// line with comma-joined values.
pub fn print_headers(headers: &HeaderMap, include: bool) {
    if include {
        println!("{}", header_lines(headers).join("\n"));
    }
}

fn header_lines(headers: &HeaderMap) -> Vec<String> {
    let mut lines: Vec<String> = headers
        .keys()
        .map(|key| {
            let values: Vec<String> = headers
                .get_all(key)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            format!("{}: {}", canonical_header_name(key.as_str()), values.join(","))
        })
        .collect();
    lines.sort();
    lines
}

// Wire names arrive lowercased; restore the conventional Title-Case form.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Reads the whole response body and writes it to stdout with a trailing
/// newline.
///
/// # Errors
///
/// Returns [`VisitError::Body`] when the body stream fails mid-transfer and
/// [`VisitError::Output`] when stdout does.
pub async fn print_body(body: Incoming) -> Result<(), VisitError> {
    let bytes = body
        .collect()
        .await
        .map_err(|source| VisitError::Body { source })?
        .to_bytes();

    let mut out = io::stdout();
    out.write_all(&bytes)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderName, HeaderValue};

    #[test]
    fn test_canonical_header_name_title_cases_segments() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_name("etag"), "Etag");
        assert_eq!(canonical_header_name("DNT"), "Dnt");
    }

    #[test]
    fn test_header_lines_sorted_by_name() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("test"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        headers.insert("date", HeaderValue::from_static("today"));

        let lines = header_lines(&headers);
        assert_eq!(
            lines,
            vec![
                "Content-Type: text/plain".to_string(),
                "Date: today".to_string(),
                "Server: test".to_string(),
            ]
        );
    }

    #[test]
    fn test_header_lines_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        let name = HeaderName::from_static("set-cookie");
        headers.append(&name, HeaderValue::from_static("a=1"));
        headers.append(&name, HeaderValue::from_static("b=2"));

        let lines = header_lines(&headers);
        assert_eq!(lines, vec!["Set-Cookie: a=1,b=2".to_string()]);
    }

    #[test]
    fn test_status_color_by_class() {
        assert_eq!(status_color(StatusCode::OK), Color::Green);
        assert_eq!(status_color(StatusCode::MOVED_PERMANENTLY), Color::Yellow);
        assert_eq!(status_color(StatusCode::NOT_FOUND), Color::Red);
        assert_eq!(status_color(StatusCode::INTERNAL_SERVER_ERROR), Color::Red);
    }

    #[test]
    fn test_status_line_format() {
        let line = format!("{:?} {}", Version::HTTP_11, StatusCode::OK);
        assert_eq!(line, "HTTP/1.1 200 OK");
    }
}
