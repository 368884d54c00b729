//! Request dispatch.
//!
//! # Responsibilities
//! - Match an incoming request path against the route table
//! - Return the first (most specific) match, or an explicit no-match
//!
//! # Design Decisions
//! - Pure function of the immutable table: no state, no locks
//! - First match wins; specificity was settled when the table was sorted
//! - An unmatched path is not an error, it is the hosting layer's 404

use crate::routing::table::{Route, RoutePattern, RouteTable};

impl RoutePattern {
    /// Whether this pattern matches a request path.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(literal) => path == literal,
            RoutePattern::Prefix(prefix) => {
                // A prefix pattern also claims the bare path without
                // its trailing separator, as servlet-style mappings do.
                path.starts_with(prefix.as_str())
                    || (prefix.ends_with('/') && path == &prefix[..prefix.len() - 1])
            }
        }
    }
}

impl RouteTable {
    /// Find the route handling `path`, if any.
    pub fn dispatch(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.pattern.matches(path))
    }
}
