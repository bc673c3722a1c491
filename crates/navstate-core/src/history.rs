//! Ordered stack of visited route paths.

use navstate_model::RoutePath;

/// What a route-change notification did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChange {
    /// First route observed since the engine started; not a transition.
    Seeded,
    /// The path was already on top of the stack.
    Unchanged,
    /// A new entry was appended.
    Pushed,
}

/// Distinct route paths visited in this session, oldest first.
///
/// Consecutive equal entries never accumulate. When the stack grows past its
/// capacity the oldest entries are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    entries: Vec<RoutePath>,
    capacity: usize,
    observed: bool,
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            observed: false,
        }
    }

    /// Restore a persisted stack, collapsing any consecutive duplicates.
    pub fn from_entries(mut entries: Vec<RoutePath>, capacity: usize) -> Self {
        entries.dedup();
        let mut stack = Self {
            entries,
            ..Self::new(capacity)
        };
        stack.enforce_capacity();
        stack
    }

    /// Record a route transition.
    ///
    /// A path equal to the current top is a no-op, which also covers a
    /// restored session re-observing the route it was left on.
    pub fn on_route_changed(&mut self, path: &RoutePath) -> RouteChange {
        let first = !self.observed;
        self.observed = true;

        if self.current() == Some(path) {
            return RouteChange::Unchanged;
        }
        self.entries.push(path.clone());
        self.enforce_capacity();

        if first {
            RouteChange::Seeded
        } else {
            RouteChange::Pushed
        }
    }

    /// The path before the current one, if any.
    pub fn previous_path(&self) -> Option<&RoutePath> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    pub fn current(&self) -> Option<&RoutePath> {
        self.entries.last()
    }

    /// Drop the current entry and return the new top.
    ///
    /// Returns `None` and leaves the stack untouched when fewer than two
    /// entries remain; the caller then falls back to the root path.
    pub fn pop(&mut self) -> Option<RoutePath> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last().cloned()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[RoutePath] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_capacity(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }
}
