//! Tree-query capability used by row extraction.
//!
//! Extraction never talks to a concrete DOM. It only needs a node handle that
//! can report its tag, attributes, parent and children; the querySelector-style
//! operations are derived from those.

use crate::dom::selector::ElementSelector;
pub use selectors::OpaqueElement;

/// A cheap handle to an element of some DOM-like tree
pub trait QueryNode: Sized + Clone {
    /// Tag name of the element
    fn tag_name(&self) -> String;

    /// Attribute value, `None` when the attribute is absent
    fn get_attribute(&self, name: &str) -> Option<String>;

    /// Parent element, `None` at the root
    fn parent(&self) -> Option<Self>;

    /// Child elements in document order
    fn children(&self) -> Vec<Self>;

    /// One-line human-readable description of the element
    fn describe(&self) -> String;

    /// Identity of the underlying element. Two handles to the same element
    /// must return equal values while the tree is borrowed.
    fn opaque(&self) -> OpaqueElement;

    /// Direct text of the element, if the tree keeps any
    fn text_content(&self) -> Option<String> {
        None
    }

    /// Check if element has a specific class
    fn has_class(&self, class_name: &str) -> bool {
        self.get_attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    /// Check if this element matches a selector
    fn matches(&self, selector: &ElementSelector) -> bool {
        selector.matches(self)
    }

    /// Descendants in document order, excluding `self`
    fn descendants(&self) -> Descendants<Self> {
        Descendants::new(self)
    }

    /// First descendant matching the selector, in document order
    fn query_selector(&self, selector: &ElementSelector) -> Option<Self> {
        self.descendants().find(|node| node.matches(selector))
    }

    /// All descendants matching the selector, in document order
    fn query_selector_all(&self, selector: &ElementSelector) -> Vec<Self> {
        self.descendants().filter(|node| node.matches(selector)).collect()
    }

    /// Nearest ancestor-or-self matching the selector
    fn closest(&self, selector: &ElementSelector) -> Option<Self> {
        let mut cursor = Some(self.clone());
        while let Some(current) = cursor {
            if current.matches(selector) {
                return Some(current);
            }
            cursor = current.parent();
        }
        None
    }
}

/// Pre-order walk over the descendants of a node.
///
/// Uses an explicit stack, so arbitrarily deep documents are fine.
pub struct Descendants<N> {
    stack: Vec<N>,
}

impl<N: QueryNode> Descendants<N> {
    fn new(node: &N) -> Self {
        let mut stack = node.children();
        stack.reverse();
        Self { stack }
    }
}

impl<N: QueryNode> Iterator for Descendants<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
