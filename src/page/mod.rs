//! The host page: a document plus its click listeners
//!
//! A [`Page`] stands in for the browser tab the webmail client renders into.
//! Clicks are dispatched synchronously to every registered listener in
//! registration order; listeners only read the document.

pub mod listener;
pub mod registry;
pub mod sink;

pub use listener::{CLICK_TARGET_PREFIX, ClickListener, DEFAULT_ROW_HISTORY, handle_click};
pub use registry::{ClickEvent, ClickHandler, ListenerId, ListenerRegistry};
pub use sink::{ConsoleSink, LineSink, MemorySink, StdoutSink};

use crate::dom::{DomTree, ElementSelector, NodeId, QueryNode};
use crate::error::{InspectorError, Result};

/// A rendered page that click listeners can subscribe to
#[derive(Debug)]
pub struct Page {
    document: DomTree,
    listeners: ListenerRegistry,
}

impl Page {
    /// Create a page around a document
    pub fn new(document: DomTree) -> Self {
        Self {
            document,
            listeners: ListenerRegistry::new(),
        }
    }

    /// The current document
    pub fn document(&self) -> &DomTree {
        &self.document
    }

    /// Swap in a new document, as the host page does when it re-renders.
    /// Listeners stay registered.
    pub fn replace_document(&mut self, document: DomTree) -> DomTree {
        std::mem::replace(&mut self.document, document)
    }

    /// Register a click handler
    pub fn add_click_listener<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn(&ClickEvent, &DomTree) + 'static,
    {
        self.listeners.register(Box::new(handler))
    }

    /// Unregister a click handler. Returns false for unknown ids.
    pub fn remove_click_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Number of registered click handlers
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch a click on one element, returning how many listeners ran
    pub fn dispatch_click(&self, target: NodeId) -> Result<usize> {
        if !self.document.contains(target) {
            return Err(InspectorError::InvalidNode(target.index()));
        }
        Ok(self.listeners.dispatch(&ClickEvent { target }, &self.document))
    }

    /// Click every element matching `selector`, in document order.
    /// Returns the number of elements clicked.
    pub fn click(&self, selector: &str) -> Result<usize> {
        let targets = self.find_all(selector)?;
        if targets.is_empty() {
            return Err(InspectorError::ElementNotFound(format!(
                "No element matches '{}'",
                selector
            )));
        }

        for target in &targets {
            self.dispatch_click(*target)?;
        }
        Ok(targets.len())
    }

    /// Ids of all elements matching `selector`, including the root, in document order
    pub fn find_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = ElementSelector::parse(selector)?;
        let root = self.document.document();

        let mut found = Vec::new();
        if root.matches(&selector) {
            found.push(root.id());
        }
        found.extend(root.query_selector_all(&selector).iter().map(|node| node.id()));
        Ok(found)
    }
}
