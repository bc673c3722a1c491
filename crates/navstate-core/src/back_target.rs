//! Back-target resolution.
//!
//! Resolution order, first match wins:
//!
//! 1. an explicit override supplied by the invoking screen;
//! 2. the rule table, evaluated in order ([`DetailUnderListRule`],
//!    [`EditUnderDetailRule`] by default);
//! 3. the history stack's previous entry;
//! 4. the configured root path.
//!
//! Resolution never mutates anything. The generic history fallback implies a
//! pop, which [`crate::NavigationContext::navigate_back`] performs; it also
//! pops for an override or rule target equal to the previous entry.
//!
//! New nested-route rules are added by implementing [`BackRule`] and
//! registering it with [`BackTargetResolver::with_rule`].

use std::fmt;

use navstate_model::{NavigationConfig, RoutePath, SourcePointer};

use crate::history::HistoryStack;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub current: &'a RoutePath,
    pub source: &'a SourcePointer,
    pub history: &'a HistoryStack,
    pub config: &'a NavigationConfig,
}

/// What a single rule concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The route does not have this rule's shape.
    NoMatch,
    /// The rule applies and produced a target.
    Target(RoutePath),
    /// The route has this rule's shape but the target would be invalid.
    Malformed,
}

/// A `{matcher, resolver}` entry in the rule table.
pub trait BackRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, input: &ResolveInput<'_>) -> RuleOutcome;
}

/// `.../<list-route>/<id>` goes back to the list, or to the parent entity's
/// detail page when the source pointer names a parent this list honors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailUnderListRule;

impl BackRule for DetailUnderListRule {
    fn name(&self) -> &'static str {
        "detail-under-list"
    }

    fn resolve(&self, input: &ResolveInput<'_>) -> RuleOutcome {
        let segments = input.current.segments();
        let [prefix @ .., list, id] = segments.as_slice() else {
            return RuleOutcome::NoMatch;
        };
        let Some(route) = input.config.list_route(list) else {
            return RuleOutcome::NoMatch;
        };
        if id.is_empty() {
            return RuleOutcome::Malformed;
        }

        let parent = input
            .source
            .source
            .as_deref()
            .and_then(|source| route.parent_for(source));
        if let Some(parent) = parent {
            match input.source.entity_id.as_deref().filter(|value| !value.is_empty()) {
                Some(entity_id) => {
                    let target = RoutePath::from_segments(
                        prefix
                            .iter()
                            .copied()
                            .chain([parent.parent_list.as_str(), entity_id]),
                    );
                    if &target != input.current {
                        return RuleOutcome::Target(target);
                    }
                }
                None => {
                    tracing::debug!(
                        source = %parent.source,
                        "source pointer has no entity id, using list route"
                    );
                }
            }
        }

        RuleOutcome::Target(RoutePath::from_segments(
            prefix.iter().copied().chain([*list]),
        ))
    }
}

/// `.../<list-route>/<id>/edit` goes back to `.../<list-route>/<id>`,
/// regardless of any source pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditUnderDetailRule;

pub const EDIT_SEGMENT: &str = "edit";

impl BackRule for EditUnderDetailRule {
    fn name(&self) -> &'static str {
        "edit-under-detail"
    }

    fn resolve(&self, input: &ResolveInput<'_>) -> RuleOutcome {
        let segments = input.current.segments();
        let [prefix @ .., list, id, last] = segments.as_slice() else {
            return RuleOutcome::NoMatch;
        };
        if *last != EDIT_SEGMENT || input.config.list_route(list).is_none() {
            return RuleOutcome::NoMatch;
        }
        if id.is_empty() {
            return RuleOutcome::Malformed;
        }
        RuleOutcome::Target(RoutePath::from_segments(
            prefix.iter().copied().chain([*list, *id]),
        ))
    }
}

/// The resolved destination of a "go back" action and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackTarget {
    Override(RoutePath),
    Rule {
        rule: &'static str,
        path: RoutePath,
    },
    History(RoutePath),
    Root(RoutePath),
}

impl BackTarget {
    pub fn path(&self) -> &RoutePath {
        match self {
            Self::Override(path)
            | Self::Rule { path, .. }
            | Self::History(path)
            | Self::Root(path) => path,
        }
    }

    pub fn into_path(self) -> RoutePath {
        match self {
            Self::Override(path)
            | Self::Rule { path, .. }
            | Self::History(path)
            | Self::Root(path) => path,
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Rule { rule, .. } => *rule,
            Self::History(_) => "history",
            Self::Root(_) => "root",
        }
    }
}

impl fmt::Display for BackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path(), self.source_label())
    }
}

/// Ordered rule table plus the generic fallbacks.
pub struct BackTargetResolver {
    rules: Vec<Box<dyn BackRule>>,
}

impl Default for BackTargetResolver {
    fn default() -> Self {
        Self::empty()
            .with_rule(DetailUnderListRule)
            .with_rule(EditUnderDetailRule)
    }
}

impl fmt::Debug for BackTargetResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackTargetResolver")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl BackTargetResolver {
    /// A resolver with no route rules, only override and fallbacks.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl BackRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn resolve(
        &self,
        override_target: Option<&RoutePath>,
        input: &ResolveInput<'_>,
    ) -> BackTarget {
        if let Some(path) = override_target {
            return BackTarget::Override(path.clone());
        }

        for rule in &self.rules {
            match rule.resolve(input) {
                RuleOutcome::Target(path) => {
                    return BackTarget::Rule {
                        rule: rule.name(),
                        path,
                    };
                }
                RuleOutcome::Malformed => {
                    tracing::debug!(
                        rule = rule.name(),
                        current = %input.current,
                        "malformed back target, falling back to history"
                    );
                    break;
                }
                RuleOutcome::NoMatch => {}
            }
        }

        match input.history.previous_path() {
            Some(path) => BackTarget::History(path.clone()),
            None => BackTarget::Root(input.config.root_path.clone()),
        }
    }
}
