//! Raw header line parsing.

/// Splits a raw `"Key: Value"` header line at the first colon.
///
/// Trailing spaces are trimmed from the key and leading spaces and colons
/// from the value; trailing whitespace in the value is preserved. A line
/// with no colon yields `("", "")`, which callers treat as an invalid
/// header and skip with a warning rather than failing the request.
pub fn split_header_line(raw: &str) -> (&str, &str) {
    match raw.split_once(':') {
        Some((key, value)) => (
            key.trim_end_matches(' '),
            value.trim_start_matches([' ', ':']),
        ),
        None => ("", ""),
    }
}
