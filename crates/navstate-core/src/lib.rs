//! Client-side navigation history and page-state restoration.
//!
//! The engine is headless: the host application reports route changes to a
//! [`NavigationContext`] and mirrors the [`navstate_model::Location`] it
//! hands back. Everything that must survive a reload is written to a
//! [`SessionStorage`] backend as one JSON blob.
//!
//! # Architecture
//!
//! - `history` - bounded route stack ([`HistoryStack`])
//! - `page_state` - per-page snapshot cache ([`PageStateStore`])
//! - `back_target` - override, rule table, history and root fallbacks
//! - `query` / `query_sync` - list-screen parameters in the query string
//! - `storage` - session storage backends (in-memory and file)
//! - `context` - the facade tying it all together
//!
//! # Example
//!
//! ```
//! use navstate_core::{MemoryStorage, NavigationContext};
//! use navstate_model::{Location, NavigationConfig};
//!
//! let mut nav = NavigationContext::start(
//!     MemoryStorage::new(),
//!     NavigationConfig::default(),
//!     Location::parse("/admin-trip-list"),
//! );
//! nav.navigate("/admin-trip-list/42");
//! assert_eq!(nav.get_back_navigation_url().as_str(), "/admin-trip-list");
//! ```

pub mod back_target;
pub mod config;
pub mod context;
pub mod history;
pub mod page_state;
pub mod query;
pub mod query_sync;
pub mod storage;

pub use back_target::{
    BackRule, BackTarget, BackTargetResolver, DetailUnderListRule, EditUnderDetailRule,
    ResolveInput, RuleOutcome,
};
pub use config::{config_to_toml, default_config_toml, load_config, load_config_or_default};
pub use context::NavigationContext;
pub use history::{HistoryStack, RouteChange};
pub use page_state::{PageStateStore, SaveOutcome};
pub use query::QueryString;
pub use query_sync::{MountOutcome, MountPhase, QuerySync};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
