//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive, byte-wise)
//! - Split the request path into matched prefix and remainder
//! - Join a backend base URL and a remainder with exactly one separator
//!
//! # Design Decisions
//! - No normalisation of the inbound path: `/api` also matches `/apiary`
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length used to rank competing matches.
    pub fn specificity(&self) -> usize {
        self.prefix.len()
    }

    /// Returns the remainder of `path` after the prefix, if it matches.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }
}

/// Append `remainder` to `base`, making sure the join point carries a `/`.
///
/// An empty remainder becomes `/`; a remainder that already starts with
/// `/` is used as is.
pub fn join_remainder(base: &str, remainder: &str) -> String {
    let mut target = String::with_capacity(base.len() + remainder.len() + 1);
    target.push_str(base);
    if !remainder.starts_with('/') {
        target.push('/');
    }
    target.push_str(remainder);
    target
}
