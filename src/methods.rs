//! HTTP method validation.

/// The nine standard HTTP request methods.
pub const STANDARD_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "CONNECT", "OPTIONS", "TRACE",
];

/// Returns whether `method` is one of the standard HTTP methods.
///
/// The comparison is a case-sensitive exact match, so `"get"` is rejected.
pub fn is_standard_method(method: &str) -> bool {
    STANDARD_METHODS.contains(&method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_standard_methods_accepted() {
        for method in STANDARD_METHODS {
            assert!(
                is_standard_method(method),
                "{method} should be a standard method"
            );
        }
    }

    #[test]
    fn test_lowercase_rejected() {
        assert!(!is_standard_method("get"));
        assert!(!is_standard_method("Get"));
        assert!(!is_standard_method("pOST"));
    }

    #[test]
    fn test_unknown_verbs_rejected() {
        assert!(!is_standard_method("FETCH"));
        assert!(!is_standard_method("BREW"));
        assert!(!is_standard_method("GETT"));
    }

    #[test]
    fn test_empty_and_padded_rejected() {
        assert!(!is_standard_method(""));
        assert!(!is_standard_method(" GET"));
        assert!(!is_standard_method("GET "));
    }
}
