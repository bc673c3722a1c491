//! Engine configuration (persisted as TOML).

use serde::{Deserialize, Serialize};

use crate::route::RoutePath;

/// Navigation engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Back target when the history stack is exhausted.
    pub root_path: RoutePath,
    /// Session-storage key holding the main blob.
    pub storage_key: String,
    /// Session-storage key holding the source pointer's entity id.
    pub source_id_key: String,
    /// Reserved query key that forces list screens to re-initialize.
    pub reload_param: String,
    /// Maximum number of cached page states.
    pub max_page_states: usize,
    /// Maximum number of remembered history entries.
    pub max_history: usize,
    /// List routes participating in the nested back-navigation rules.
    pub list_routes: Vec<ListRouteConfig>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            root_path: RoutePath::new("/"),
            storage_key: "navigationState".to_string(),
            source_id_key: "sourceClientId".to_string(),
            reload_param: "_reload".to_string(),
            max_page_states: 100,
            max_history: 100,
            list_routes: default_list_routes(),
        }
    }
}

impl NavigationConfig {
    /// Look up a list route by its path segment.
    pub fn list_route(&self, segment: &str) -> Option<&ListRouteConfig> {
        self.list_routes.iter().find(|route| route.segment == segment)
    }
}

/// A list route segment such as `admin-trip-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRouteConfig {
    pub segment: String,
    /// Parents other than this list that a detail page can be opened from.
    #[serde(default)]
    pub sources: Vec<SourceParent>,
}

impl ListRouteConfig {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>, parent_list: impl Into<String>) -> Self {
        self.sources.push(SourceParent {
            source: source.into(),
            parent_list: parent_list.into(),
        });
        self
    }

    pub fn parent_for(&self, source: &str) -> Option<&SourceParent> {
        self.sources.iter().find(|parent| parent.source == source)
    }
}

/// Maps a source tag (e.g. `client-details`) to the list route whose detail
/// page is the parent (e.g. `admin-client-list`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceParent {
    pub source: String,
    pub parent_list: String,
}

pub const CLIENT_DETAILS_SOURCE: &str = "client-details";

fn default_list_routes() -> Vec<ListRouteConfig> {
    vec![
        ListRouteConfig::new("admin-client-list"),
        ListRouteConfig::new("admin-trip-list")
            .with_source(CLIENT_DETAILS_SOURCE, "admin-client-list"),
        ListRouteConfig::new("admin-partner-list"),
        ListRouteConfig::new("admin-offer-list")
            .with_source(CLIENT_DETAILS_SOURCE, "admin-client-list"),
        ListRouteConfig::new("admin-reservation-list")
            .with_source(CLIENT_DETAILS_SOURCE, "admin-client-list"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_admin_lists() {
        let config = NavigationConfig::default();
        assert_eq!(config.root_path.as_str(), "/");
        assert_eq!(config.reload_param, "_reload");
        let trips = config.list_route("admin-trip-list").unwrap();
        assert_eq!(
            trips.parent_for("client-details").map(|p| p.parent_list.as_str()),
            Some("admin-client-list")
        );
        assert!(config.list_route("admin-client-list").unwrap().sources.is_empty());
        assert!(config.list_route("settings").is_none());
    }
}
