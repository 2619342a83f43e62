use crate::dom::{DomTree, NodeId};
use indexmap::IndexMap;
use std::fmt;

/// A click dispatched to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Element the click landed on
    pub target: NodeId,
}

/// Callback run for every click on a page
pub type ClickHandler = Box<dyn Fn(&ClickEvent, &DomTree)>;

/// Handle returned when a click handler is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Click handlers of a page, kept in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    map: IndexMap<ListenerId, ClickHandler>,

    /// Next id to hand out. Never reset, so stale handles cannot match a newer listener.
    next_id: u64,
}

impl ListenerRegistry {
    /// Create a new empty ListenerRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler and return its id
    pub fn register(&mut self, handler: ClickHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.map.insert(id, handler);
        self.next_id += 1;
        id
    }

    /// Check if a listener is registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.map.contains_key(&id)
    }

    /// Remove a listener, keeping the order of the others
    pub fn remove(&mut self, id: ListenerId) -> Option<ClickHandler> {
        self.map.shift_remove(&id)
    }

    /// Get the number of registered listeners
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remove all listeners
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Get all ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &ListenerId> {
        self.map.keys()
    }

    /// Run every handler in registration order, returning how many ran
    pub fn dispatch(&self, event: &ClickEvent, document: &DomTree) -> usize {
        for handler in self.map.values() {
            handler(event, document);
        }
        self.map.len()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("ids", &self.map.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}
