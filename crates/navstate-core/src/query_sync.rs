//! List-screen parameter synchronization.
//!
//! A [`QuerySync`] belongs to one mounted list screen. It reads typed
//! parameters from the current query string, merges updates back into it,
//! mirrors the merged parameters into the page-state cache, and on mount
//! restores cached parameters when the screen is entered with an empty
//! query string.
//!
//! Mount handling is an explicit state machine:
//!
//! ```text
//! Uninitialized --on_mount--> Hydrating --> Ready
//!       ^                                     |
//!       +------- unmount / _reload -----------+
//! ```
//!
//! Once `Ready`, further `on_mount` calls are no-ops, so the restoring write
//! can never re-trigger restoration.

use navstate_model::{ListParams, Location, PageId, ParamPatch, RoutePath};
use tracing::debug;

use crate::context::NavigationContext;
use crate::query::QueryString;
use crate::storage::SessionStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPhase {
    #[default]
    Uninitialized,
    Hydrating,
    Ready,
}

/// What [`QuerySync::on_mount`] decided.
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    /// Initialization already ran for this mount.
    AlreadyMounted,
    /// Cached parameters were written back into the URL.
    Restored(ListParams),
    /// Navbar navigation: the cached parameters are discarded and the screen
    /// starts at defaults.
    Reset,
    /// The URL already carried parameters, or nothing was cached.
    Fresh,
}

#[derive(Debug, Clone)]
pub struct QuerySync {
    page_id: PageId,
    phase: MountPhase,
}

impl QuerySync {
    pub fn new(page_id: impl Into<PageId>) -> Self {
        Self {
            page_id: page_id.into(),
            phase: MountPhase::Uninitialized,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    /// Typed parameters of the current query string.
    pub fn read_params<S: SessionStorage>(&self, context: &NavigationContext<S>) -> ListParams {
        QueryString::parse(&context.location().query).to_params(&context.config().reload_param)
    }

    /// Merge `patch` into the URL and cache the merged parameters.
    pub fn write_params<S: SessionStorage>(
        &self,
        context: &mut NavigationContext<S>,
        patch: &ParamPatch,
    ) -> ListParams {
        let mut query = QueryString::parse(&context.location().query);
        query.apply(patch);
        let location = context.location().with_query(query.encode());
        context.replace_location(location);

        let params = self.read_params(context);
        context.save_page_state(&self.page_id, params.to_snapshot());
        params
    }

    /// Merge current parameters with `overrides` and navigate to `path`.
    ///
    /// Well-known keys are emitted first; the query is omitted when empty.
    pub fn navigate_with_params<S: SessionStorage>(
        &self,
        context: &mut NavigationContext<S>,
        path: impl Into<RoutePath>,
        overrides: &ParamPatch,
    ) -> Location {
        let mut params = self.read_params(context);
        params.apply(overrides);
        let location = Location::new(path, QueryString::from_params(&params).encode());
        context.navigate(location.clone());
        location
    }

    /// Run mount-time initialization at most once per mount.
    ///
    /// The reserved reload key is stripped from the URL and resets the mount
    /// guard first. A navbar entry drops the cached snapshot. Otherwise
    /// restoration happens only when the query is empty and a non-empty
    /// snapshot is cached.
    pub fn on_mount<S: SessionStorage>(&mut self, context: &mut NavigationContext<S>) -> MountOutcome {
        let navbar = context.is_navbar_navigation();
        let reload_param = context.config().reload_param.clone();

        let mut query = QueryString::parse(&context.location().query);
        if query.contains_key(&reload_param) {
            query.remove_key(&reload_param);
            let location = context.location().with_query(query.encode());
            context.replace_location(location);
            self.phase = MountPhase::Uninitialized;
            debug!(page_id = %self.page_id, "forced reload");
        }

        if self.phase != MountPhase::Uninitialized {
            return MountOutcome::AlreadyMounted;
        }
        self.phase = MountPhase::Hydrating;

        let outcome = if navbar {
            context.clear_page_state(&self.page_id);
            MountOutcome::Reset
        } else if !query.is_empty() {
            MountOutcome::Fresh
        } else {
            let stored = context
                .get_page_state(&self.page_id)
                .map(ListParams::from_snapshot)
                .filter(|params| !params.is_empty());
            match stored {
                Some(stored) => {
                    let params = self.write_params(context, &ParamPatch::from_params(&stored));
                    MountOutcome::Restored(params)
                }
                None => MountOutcome::Fresh,
            }
        };

        debug!(page_id = %self.page_id, ?outcome, "list screen mounted");
        self.phase = MountPhase::Ready;
        outcome
    }

    pub fn unmount(&mut self) {
        self.phase = MountPhase::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use navstate_model::NavigationConfig;
    use serde_json::json;

    fn start(path: &str) -> NavigationContext<MemoryStorage> {
        NavigationContext::start(
            MemoryStorage::new(),
            NavigationConfig::default(),
            Location::parse(path),
        )
    }

    #[test]
    fn write_params_updates_url_and_cache() {
        let mut context = start("/admin-client-list?page=1");
        let sync = QuerySync::new("admin-client-list");
        sync.write_params(&mut context, &ParamPatch::new().set("searchTerm", "foo"));
        assert_eq!(context.location().query, "page=1&searchTerm=foo");
        assert_eq!(
            context.get_page_state(&PageId::new("admin-client-list")),
            Some(&json!({ "page": 1, "searchTerm": "foo" }))
        );
    }

    #[test]
    fn navigate_with_params_orders_keys() {
        let mut context = start("/admin-trip-list?status=open&page=4");
        let sync = QuerySync::new("admin-trip-list");
        let location = sync.navigate_with_params(
            &mut context,
            "/admin-trip-list",
            &ParamPatch::new().set("page", 1).set("pageSize", 20),
        );
        assert_eq!(location.to_string(), "/admin-trip-list?page=1&pageSize=20&status=open");
    }

    #[test]
    fn navigate_with_empty_params_omits_query() {
        let mut context = start("/admin-trip-list?page=2");
        let sync = QuerySync::new("admin-trip-list");
        let location =
            sync.navigate_with_params(&mut context, "/admin-trip-list/9", &ParamPatch::new().remove("page"));
        assert_eq!(location.to_string(), "/admin-trip-list/9");
        assert_eq!(context.location(), &location);
    }

    #[test]
    fn mount_runs_once() {
        let mut context = start("/admin-client-list");
        context.save_page_state(&PageId::new("admin-client-list"), json!({ "page": 2 }));
        let mut sync = QuerySync::new("admin-client-list");

        assert!(matches!(sync.on_mount(&mut context), MountOutcome::Restored(_)));
        assert_eq!(sync.phase(), MountPhase::Ready);
        context.replace_location(Location::parse("/admin-client-list"));
        assert_eq!(sync.on_mount(&mut context), MountOutcome::AlreadyMounted);
        assert_eq!(context.location().query, "");
    }

    #[test]
    fn query_present_is_not_overwritten() {
        let mut context = start("/admin-client-list?page=5");
        context.save_page_state(&PageId::new("admin-client-list"), json!({ "page": 2 }));
        let mut sync = QuerySync::new("admin-client-list");
        assert_eq!(sync.on_mount(&mut context), MountOutcome::Fresh);
        assert_eq!(context.location().query, "page=5");
    }

    #[test]
    fn reload_key_resets_the_guard() {
        let mut context = start("/admin-client-list");
        let mut sync = QuerySync::new("admin-client-list");
        assert_eq!(sync.on_mount(&mut context), MountOutcome::Fresh);

        context.save_page_state(&PageId::new("admin-client-list"), json!({ "page": 7 }));
        context.replace_location(Location::parse("/admin-client-list?_reload=1"));
        let outcome = sync.on_mount(&mut context);

        assert!(matches!(outcome, MountOutcome::Restored(ref params) if params.page() == Some(7)));
        assert_eq!(context.location().query, "page=7");
        assert_eq!(context.history().len(), 1);
    }

    #[test]
    fn navbar_mount_discards_cached_params() {
        let mut context = start("/admin-trip-list");
        let id = PageId::new("admin-client-list");
        context.save_page_state(&id, json!({ "page": 3 }));
        context.navigate_from_navbar("/admin-client-list");
        let mut sync = QuerySync::new("admin-client-list");
        assert_eq!(sync.on_mount(&mut context), MountOutcome::Reset);
        assert!(context.get_page_state(&id).is_none());
    }

    #[test]
    fn unmount_allows_next_mount() {
        let mut context = start("/admin-client-list");
        let mut sync = QuerySync::new("admin-client-list");
        sync.on_mount(&mut context);
        sync.unmount();
        assert_eq!(sync.phase(), MountPhase::Uninitialized);
        assert_eq!(sync.on_mount(&mut context), MountOutcome::Fresh);
    }
}
