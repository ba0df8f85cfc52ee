//! HTTP method names.
//!
//! Methods are plain uppercase tokens so non-standard methods (e.g. proxy
//! control verbs) route through the same trees as the standard set.

pub const GET: &str = "GET";
pub const POST: &str = "POST";
pub const PUT: &str = "PUT";
pub const PATCH: &str = "PATCH";
pub const DELETE: &str = "DELETE";
pub const HEAD: &str = "HEAD";
pub const OPTIONS: &str = "OPTIONS";
pub const CONNECT: &str = "CONNECT";
pub const TRACE: &str = "TRACE";

/// Every standard method, used by `any` registrations.
pub const ALL: [&str; 9] = [
    GET, POST, PUT, PATCH, HEAD, OPTIONS, DELETE, CONNECT, TRACE,
];

/// A method token must be a non-empty run of ASCII uppercase letters.
pub(crate) fn is_valid(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uppercase_tokens() {
        assert!(is_valid("GET"));
        assert!(is_valid("PURGE"));
    }

    #[test]
    fn rejects_empty_and_mixed_case() {
        assert!(!is_valid(""));
        assert!(!is_valid("get"));
        assert!(!is_valid("GET "));
    }
}
