//! Data model for the navigation history and page-state engine.

pub mod blob;
pub mod config;
pub mod error;
pub mod params;
pub mod route;

pub use blob::{PersistedBlob, SourcePointer};
pub use config::{CLIENT_DETAILS_SOURCE, ListRouteConfig, NavigationConfig, SourceParent};
pub use error::{ConfigError, StorageError, StorageResult};
pub use params::{
    ListParams, PAGE, PAGE_SIZE, ParamPatch, ParamUpdate, QueryScalar, QueryValue, SEARCH_TERM,
    SORT_OPTION, WELL_KNOWN_KEYS,
};
pub use route::{Location, PageId, RoutePath};
