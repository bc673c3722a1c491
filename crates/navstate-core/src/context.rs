//! The navigation façade handed to every screen.
//!
//! [`NavigationContext`] owns the history stack, the page-state cache, the
//! source pointer and the current location, and keeps one session-storage
//! blob in step with them. Every mutation serializes the whole blob and
//! writes it only when it differs from what was last written, so repeated
//! saves of unchanged state never touch storage.
//!
//! Nothing here surfaces an error to a screen. A malformed blob is treated as
//! a first visit and storage failures are logged; restoration degrades to
//! "no restoration", never to a broken navigation.

use navstate_model::{
    Location, NavigationConfig, PageId, PersistedBlob, RoutePath, SourcePointer,
};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::back_target::{BackTarget, BackTargetResolver, ResolveInput};
use crate::history::{HistoryStack, RouteChange};
use crate::page_state::{PageStateStore, SaveOutcome};
use crate::storage::SessionStorage;

#[derive(Debug)]
pub struct NavigationContext<S> {
    storage: S,
    config: NavigationConfig,
    resolver: BackTargetResolver,
    history: HistoryStack,
    page_states: PageStateStore,
    source: SourcePointer,
    location: Location,
    navbar_navigation: bool,
    last_persisted: Option<String>,
}

impl<S: SessionStorage> NavigationContext<S> {
    /// Hydrate from `storage` and observe the initial location.
    pub fn start(storage: S, config: NavigationConfig, initial: Location) -> Self {
        Self::with_resolver(storage, config, BackTargetResolver::default(), initial)
    }

    pub fn with_resolver(
        storage: S,
        config: NavigationConfig,
        resolver: BackTargetResolver,
        initial: Location,
    ) -> Self {
        let mut context = Self {
            history: HistoryStack::new(config.max_history),
            page_states: PageStateStore::new(config.max_page_states),
            storage,
            config,
            resolver,
            source: SourcePointer::default(),
            location: initial,
            navbar_navigation: false,
            last_persisted: None,
        };
        context.hydrate();
        let path = context.location.path.clone();
        context.record_route(&path);
        context
    }

    fn hydrate(&mut self) {
        if let Some(blob) = self.read_blob() {
            debug!(
                history = blob.navigation_history.len(),
                page_states = blob.page_states.len(),
                "restored navigation state"
            );
            self.history =
                HistoryStack::from_entries(blob.navigation_history, self.config.max_history);
            self.page_states.hydrate(blob.page_states);
            self.source.source = blob.navigation_source;
            self.last_persisted = self.current_blob().to_json().ok();
        }

        self.source.entity_id = match self.storage.get_item(&self.config.source_id_key) {
            Ok(value) => value,
            Err(error) => {
                warn!("Failed to read source entity id: {error}");
                None
            }
        };
    }

    fn read_blob(&self) -> Option<PersistedBlob> {
        let raw = match self.storage.get_item(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!("Failed to read navigation state: {error}");
                return None;
            }
        };
        match PersistedBlob::from_json(&raw) {
            Ok(blob) => Some(blob),
            Err(error) => {
                warn!("Discarding malformed navigation state: {error}");
                None
            }
        }
    }

    fn current_blob(&self) -> PersistedBlob {
        PersistedBlob {
            page_states: self.page_states.to_map(),
            navigation_source: self.source.source.clone(),
            navigation_history: self.history.entries().to_vec(),
        }
    }

    /// Write the whole blob if it differs from the last write.
    fn persist(&mut self) {
        let json = match self.current_blob().to_json() {
            Ok(json) => json,
            Err(error) => {
                warn!("Failed to serialize navigation state: {error}");
                return;
            }
        };
        if self.last_persisted.as_deref() == Some(json.as_str()) {
            trace!("navigation state unchanged, skipping write");
            return;
        }
        match self.storage.set_item(&self.config.storage_key, &json) {
            Ok(()) => self.last_persisted = Some(json),
            Err(error) => warn!("Failed to persist navigation state: {error}"),
        }
    }

    fn record_route(&mut self, path: &RoutePath) {
        match self.history.on_route_changed(path) {
            RouteChange::Unchanged => {}
            change => {
                debug!(path = %path, ?change, depth = self.history.len(), "route recorded");
                self.persist();
            }
        }
    }

    /// Tracked route change: the new path is recorded in history.
    pub fn navigate(&mut self, target: impl Into<Location>) {
        self.navbar_navigation = false;
        self.location = target.into();
        let path = self.location.path.clone();
        self.record_route(&path);
    }

    /// Route change initiated by the primary menu.
    ///
    /// Sets the navbar flag for this cycle, so list screens start clean, and
    /// clears the source pointer.
    pub fn navigate_from_navbar(&mut self, target: impl Into<Location>) {
        self.clear_navigation_source();
        self.navigate(target);
        self.navbar_navigation = true;
    }

    /// Replace the current location without recording a transition.
    pub fn replace_location(&mut self, location: Location) {
        self.navbar_navigation = false;
        self.location = location;
    }

    /// Compute the back target without side effects.
    pub fn resolve_back_target(&self, override_target: Option<&RoutePath>) -> BackTarget {
        let input = ResolveInput {
            current: &self.location.path,
            source: &self.source,
            history: &self.history,
            config: &self.config,
        };
        self.resolver.resolve(override_target, &input)
    }

    pub fn get_back_navigation_url(&self) -> RoutePath {
        self.resolve_back_target(None).into_path()
    }

    /// Resolve the back target and go there.
    ///
    /// The generic history fallback pops the stack; when it is exhausted the
    /// stack restarts at the root path. An override or rule target pops only
    /// when it is the previous entry, otherwise it is pushed like any
    /// navigation.
    pub fn navigate_back(&mut self, override_target: Option<RoutePath>) -> BackTarget {
        let target = self.resolve_back_target(override_target.as_ref());
        match &target {
            BackTarget::History(_) => {
                self.history.pop();
            }
            BackTarget::Root(_) => self.history.clear(),
            BackTarget::Override(path) | BackTarget::Rule { path, .. } => {
                if self.history.previous_path() == Some(path) {
                    self.history.pop();
                }
            }
        }
        debug!(from = %self.location.path, to = %target, "navigating back");
        self.navigate(Location::new(target.path().clone(), ""));
        self.persist();
        target
    }

    /// Cache a screen snapshot. Returns `true` when it changed.
    pub fn save_page_state(&mut self, page_id: &PageId, snapshot: Value) -> bool {
        match self.page_states.save(page_id, snapshot) {
            SaveOutcome::Unchanged => false,
            SaveOutcome::Updated => {
                self.persist();
                true
            }
        }
    }

    pub fn get_page_state(&self, page_id: &PageId) -> Option<&Value> {
        self.page_states.get(page_id)
    }

    pub fn clear_page_state(&mut self, page_id: &PageId) {
        if self.page_states.remove(page_id) {
            self.persist();
        }
    }

    pub fn set_navigation_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if self.source.source.as_deref() != Some(source.as_str()) {
            self.source.source = Some(source);
            self.persist();
        }
    }

    /// Store the source pointer's entity id under its own storage key.
    pub fn set_source_client_id(&mut self, entity_id: impl Into<String>) {
        let entity_id = entity_id.into();
        if self.source.entity_id.as_deref() == Some(entity_id.as_str()) {
            return;
        }
        if let Err(error) = self
            .storage
            .set_item(&self.config.source_id_key, &entity_id)
        {
            warn!("Failed to persist source entity id: {error}");
        }
        self.source.entity_id = Some(entity_id);
    }

    /// Forget both halves of the source pointer.
    pub fn clear_navigation_source(&mut self) {
        if self.source.entity_id.take().is_some()
            && let Err(error) = self.storage.remove_item(&self.config.source_id_key)
        {
            warn!("Failed to clear source entity id: {error}");
        }
        if self.source.source.take().is_some() {
            self.persist();
        }
    }

    pub fn navigation_source(&self) -> Option<&str> {
        self.source.source.as_deref()
    }

    pub fn source_client_id(&self) -> Option<&str> {
        self.source.entity_id.as_deref()
    }

    pub fn source_pointer(&self) -> &SourcePointer {
        &self.source
    }

    /// True for the route-change cycle started by [`Self::navigate_from_navbar`].
    pub fn is_navbar_navigation(&self) -> bool {
        self.navbar_navigation
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn previous_path(&self) -> Option<&RoutePath> {
        self.history.previous_path()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn page_state_count(&self) -> usize {
        self.page_states.len()
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
