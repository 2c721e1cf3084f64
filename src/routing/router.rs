//! Route lookup.
//!
//! # Responsibilities
//! - Store the routes built from configuration
//! - Resolve a request path to a backend target URL
//! - Return the resolved target or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Longest prefix wins; equal lengths keep the first route in table order
//! - Explicit `None` rather than silent default

use std::collections::HashSet;

use crate::config::RouteConfig;
use crate::routing::matcher::{join_remainder, PathPrefixMatcher};

/// A `prefix -> target base URL` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    matcher: PathPrefixMatcher,
    target_base_url: String,
}

impl Route {
    pub fn new(prefix: impl Into<String>, target_base_url: impl Into<String>) -> Self {
        Self {
            matcher: PathPrefixMatcher::new(prefix),
            target_base_url: target_base_url.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn target_base_url(&self) -> &str {
        &self.target_base_url
    }
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The route that won.
    pub route: &'a Route,
    /// Base URL with the path remainder appended.
    pub target_url: String,
}

/// Immutable route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from configuration, keeping declaration order.
    pub fn from_config(configs: Vec<RouteConfig>) -> Self {
        let mut seen = HashSet::new();
        let routes = configs
            .into_iter()
            .map(|config| {
                if !seen.insert(config.prefix.clone()) {
                    tracing::warn!(prefix = %config.prefix, url = %config.url, "Duplicate route prefix is shadowed by an earlier route");
                }
                Route::new(config.prefix, config.url)
            })
            .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the most specific route whose prefix matches `path`.
    pub fn lookup(&self, path: &str) -> Option<Resolution<'_>> {
        let mut best: Option<(&Route, &str)> = None;

        for route in &self.routes {
            let Some(remainder) = route.matcher.strip(path) else {
                continue;
            };
            let better = match best {
                Some((current, _)) => current.matcher.specificity() < route.matcher.specificity(),
                None => true,
            };
            if better {
                best = Some((route, remainder));
            }
        }

        best.map(|(route, remainder)| Resolution {
            route,
            target_url: join_remainder(&route.target_base_url, remainder),
        })
    }

    /// Resolve `path` to the backend URL it should be forwarded to.
    pub fn resolve(&self, path: &str) -> Option<String> {
        self.lookup(path).map(|resolution| resolution.target_url)
    }
}
