//! The persisted session blob and the source pointer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::route::{PageId, RoutePath};

/// Everything the engine keeps in one session-storage key.
///
/// ```json
/// {
///   "pageStates": { "<pageId>": <opaque snapshot> },
///   "navigationSource": "<string|null>",
///   "navigationHistory": ["<path>", "<path>"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBlob {
    #[serde(default)]
    pub page_states: BTreeMap<PageId, Value>,
    #[serde(default)]
    pub navigation_source: Option<String>,
    #[serde(default)]
    pub navigation_history: Vec<RoutePath>,
}

impl PersistedBlob {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Secondary "where did I come from" marker for detail screens with more
/// than one possible parent.
///
/// `source` lives in the main blob; `entity_id` is stored under its own key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePointer {
    pub source: Option<String>,
    pub entity_id: Option<String>,
}

impl SourcePointer {
    pub fn new(source: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.entity_id.is_none()
    }
}
