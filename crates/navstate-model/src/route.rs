//! Route paths, locations and page identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque navigable location (path plus, where relevant, an entity id segment).
///
/// Equality is exact string equality. No trailing-slash or percent-encoding
/// normalization is applied; the routing layer owns that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments after the leading slash, including empty ones.
    ///
    /// `/admin-trip-list/42` yields `["admin-trip-list", "42"]`, while
    /// `/admin-trip-list/` yields `["admin-trip-list", ""]`.
    pub fn segments(&self) -> Vec<&str> {
        let trimmed = self.0.strip_prefix('/').unwrap_or(&self.0);
        if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        }
    }

    /// Build a path from segments, always with a leading slash.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut path = String::new();
        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push('/');
        }
        Self(path)
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoutePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RoutePath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The current address: a route path and its raw query string (without `?`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: RoutePath,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<RoutePath>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Split `"/path?query"` into its path and query parts.
    pub fn parse(href: &str) -> Self {
        match href.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(href, ""),
        }
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    #[must_use]
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            query: query.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Caller-chosen key identifying a logical page in the page-state cache.
///
/// List views use a constant id (`admin-client-list`); detail views compose
/// the id with the entity id (`client-detail-7`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Compose a detail page id such as `client-detail-7`.
    pub fn detail(prefix: &str, entity_id: &str) -> Self {
        Self(format!("{prefix}-{entity_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
