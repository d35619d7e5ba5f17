//! Listener Registry - which bound elements own a live global click listener.
//!
//! Pure bookkeeping. The key is a back-reference to the element; the global
//! listener list in `state::mouse` is what keeps a handler alive. Removing
//! an entry here does not uninstall anything, and overwriting an entry does
//! not uninstall the listener it displaced. Callers get the displaced entry
//! back and decide.

use std::collections::HashMap;
use std::fmt;

use crate::state::mouse::{ListenerId, MouseHandler};

/// Element identity used as the registry key (an engine index).
pub type ElementId = usize;

/// A handler together with the id of the global listener it was installed as.
#[derive(Clone)]
pub struct InstalledHandler {
    pub listener: ListenerId,
    pub handler: MouseHandler,
}

impl fmt::Debug for InstalledHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstalledHandler")
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

/// Table from bound element to its active handler.
///
/// At most one entry per element.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: HashMap<ElementId, InstalledHandler>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `element`.
    ///
    /// Returns the displaced entry, whose listener is still installed.
    pub fn register(&mut self, element: ElementId, handler: InstalledHandler) -> Option<InstalledHandler> {
        self.entries.insert(element, handler)
    }

    pub fn lookup(&self, element: ElementId) -> Option<&InstalledHandler> {
        self.entries.get(&element)
    }

    /// Delete the entry for `element`. Absent entries are not an error.
    pub fn remove(&mut self, element: ElementId) -> Option<InstalledHandler> {
        self.entries.remove(&element)
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.entries.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound elements, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.entries.keys().copied()
    }
}
