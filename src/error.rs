use thiserror::Error;

/// Errors raised by the plumbing around row extraction.
///
/// Extraction itself never fails: missing rows, elements and attributes
/// degrade to empty output. These variants cover loading documents, parsing
/// selectors and driving a browser.
#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Node {0} does not belong to this document")]
    InvalidNode(usize),

    #[error("Failed to load configuration: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InspectorError>;
