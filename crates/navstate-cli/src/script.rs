//! Navigation scripts.
//!
//! A script is a JSON array of steps that drive a [`NavigationContext`] the
//! way a host application would:
//!
//! ```json
//! [
//!   { "op": "visit", "path": "/admin-client-list" },
//!   { "op": "mount", "page": "admin-client-list" },
//!   { "op": "write", "page": "admin-client-list", "params": { "page": 3 } },
//!   { "op": "source", "tag": "client-details", "id": "7" },
//!   { "op": "visit", "path": "/admin-trip-list/42" },
//!   { "op": "back" }
//! ]
//! ```

use std::collections::BTreeMap;

use navstate_core::{MountOutcome, NavigationContext, QuerySync, SessionStorage};
use navstate_model::{
    Location, NavigationConfig, PageId, ParamPatch, PersistedBlob, RoutePath,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    /// Tracked route change.
    Visit { path: String },
    /// Route change from the primary menu.
    Navbar { path: String },
    /// Go back, optionally to an explicit target.
    Back {
        #[serde(default)]
        target: Option<String>,
    },
    /// Save a page-state snapshot.
    Save { page: String, state: Value },
    /// Set the source pointer before entering a child route.
    Source {
        tag: String,
        #[serde(default)]
        id: Option<String>,
    },
    ClearSource,
    /// Mount a list screen on the current location.
    Mount { page: String },
    Unmount { page: String },
    /// Merge parameters into the current query string.
    Write {
        page: String,
        params: Map<String, Value>,
    },
    /// Navigate to `path` carrying the list screen's parameters.
    ListNav {
        page: String,
        path: String,
        #[serde(default)]
        params: Map<String, Value>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Visit { .. } => "visit",
            Self::Navbar { .. } => "navbar",
            Self::Back { .. } => "back",
            Self::Save { .. } => "save",
            Self::Source { .. } => "source",
            Self::ClearSource => "clear-source",
            Self::Mount { .. } => "mount",
            Self::Unmount { .. } => "unmount",
            Self::Write { .. } => "write",
            Self::ListNav { .. } => "list-nav",
        }
    }
}

pub fn parse_script(json: &str) -> serde_json::Result<Vec<Step>> {
    serde_json::from_str(json)
}

/// State after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub step: &'static str,
    pub detail: String,
    pub location: String,
    pub depth: usize,
    /// Where "back" would go from here, and which rule decided it.
    pub back: String,
}

/// Drives a [`NavigationContext`] with the list screens a script mounts.
pub struct ScriptRunner<S> {
    context: NavigationContext<S>,
    screens: BTreeMap<String, QuerySync>,
    executed: usize,
}

impl<S: SessionStorage> ScriptRunner<S> {
    pub fn new(context: NavigationContext<S>) -> Self {
        Self {
            context,
            screens: BTreeMap::new(),
            executed: 0,
        }
    }

    pub fn run(&mut self, steps: &[Step]) -> Vec<StepReport> {
        steps.iter().map(|step| self.run_step(step)).collect()
    }

    pub fn run_step(&mut self, step: &Step) -> StepReport {
        self.executed += 1;
        let detail = self.apply(step);
        tracing::debug!(
            index = self.executed,
            step = step.name(),
            location = %self.context.location(),
            "script step"
        );
        StepReport {
            index: self.executed,
            step: step.name(),
            detail,
            location: self.context.location().to_string(),
            depth: self.context.history().len(),
            back: self.context.resolve_back_target(None).to_string(),
        }
    }

    fn apply(&mut self, step: &Step) -> String {
        let context = &mut self.context;
        match step {
            Step::Visit { path } => {
                context.navigate(Location::parse(path));
                path.clone()
            }
            Step::Navbar { path } => {
                context.navigate_from_navbar(Location::parse(path));
                path.clone()
            }
            Step::Back { target } => {
                let target = context.navigate_back(target.as_deref().map(RoutePath::from));
                format!("via {}", target.source_label())
            }
            Step::Save { page, state } => {
                if context.save_page_state(&PageId::new(page.as_str()), state.clone()) {
                    format!("{page} updated")
                } else {
                    format!("{page} unchanged")
                }
            }
            Step::Source { tag, id } => {
                context.set_navigation_source(tag.as_str());
                match id {
                    Some(id) => {
                        context.set_source_client_id(id.as_str());
                        format!("{tag} #{id}")
                    }
                    None => tag.clone(),
                }
            }
            Step::ClearSource => {
                context.clear_navigation_source();
                String::new()
            }
            Step::Mount { page } => {
                let screen = screen(&mut self.screens, page);
                match screen.on_mount(context) {
                    MountOutcome::AlreadyMounted => "already mounted".to_string(),
                    MountOutcome::Restored(params) => format!("restored {} params", params.len()),
                    MountOutcome::Reset => "reset (navbar)".to_string(),
                    MountOutcome::Fresh => "fresh".to_string(),
                }
            }
            Step::Unmount { page } => {
                if let Some(screen) = self.screens.get_mut(page) {
                    screen.unmount();
                }
                page.clone()
            }
            Step::Write { page, params } => {
                let patch = ParamPatch::from_json_object(params);
                let merged = screen(&mut self.screens, page).write_params(context, &patch);
                format!("{} params", merged.len())
            }
            Step::ListNav { page, path, params } => {
                let patch = ParamPatch::from_json_object(params);
                screen(&mut self.screens, page)
                    .navigate_with_params(context, path.as_str(), &patch)
                    .to_string()
            }
        }
    }

    pub fn context(&self) -> &NavigationContext<S> {
        &self.context
    }

    pub fn into_context(self) -> NavigationContext<S> {
        self.context
    }
}

fn screen<'a>(screens: &'a mut BTreeMap<String, QuerySync>, page: &str) -> &'a mut QuerySync {
    screens
        .entry(page.to_string())
        .or_insert_with(|| QuerySync::new(page))
}

/// Where a resumed session starts: the last recorded route, or the root.
pub fn resume_location(storage: &impl SessionStorage, config: &NavigationConfig) -> Location {
    let last = storage
        .get_item(&config.storage_key)
        .ok()
        .flatten()
        .and_then(|raw| PersistedBlob::from_json(&raw).ok())
        .and_then(|blob| blob.navigation_history.last().cloned());
    Location::new(last.unwrap_or_else(|| config.root_path.clone()), "")
}
