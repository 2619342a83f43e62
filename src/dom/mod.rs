//! DOM representation and querying
//!
//! This module provides the in-memory page model row extraction runs against:
//! - ElementNode: element data, nestable for building trees by hand
//! - DomTree: arena of elements with parent links, in document order
//! - ElementSelector: CSS selector parsing and matching over any tree
//! - QueryNode: querySelector/closest/getAttribute capability over any tree

pub mod element;
pub mod query;
pub mod selector;
pub mod tree;

pub use element::ElementNode;
pub use query::{Descendants, OpaqueElement, QueryNode};
pub use selector::ElementSelector;
pub use tree::{DomTree, NodeId, NodeRef};

use crate::error::Result;
use std::path::Path;

/// On-disk formats a document can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Raw HTML markup
    Html,
    /// JSON snapshot written by [`DomTree::to_json`]
    Json,
}

impl DocumentFormat {
    /// Guess the format from a file extension, defaulting to HTML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Html,
        }
    }
}

/// Parse a document from a string
pub fn parse_document(source: &str, format: DocumentFormat) -> Result<DomTree> {
    match format {
        DocumentFormat::Html => Ok(DomTree::from_html(source)),
        DocumentFormat::Json => DomTree::from_json(source),
    }
}

/// Load a document from a file in the given format
pub fn read_document(path: impl AsRef<Path>, format: DocumentFormat) -> Result<DomTree> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    log::debug!("Loading {:?} document from {}", format, path.display());
    parse_document(&source, format)
}

/// Load a document from a file, choosing the format by extension
pub fn load_document(path: impl AsRef<Path>) -> Result<DomTree> {
    let path = path.as_ref();
    read_document(path, DocumentFormat::from_path(path))
}
