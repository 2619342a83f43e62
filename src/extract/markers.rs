use crate::error::{InspectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Selector of the element wrapping one conversation row
pub const DEFAULT_LIST_ITEM_SELECTOR: &str = "div[role='listitem']";

/// Selector of the sender chip inside a row
pub const DEFAULT_SENDER_SELECTOR: &str = ".gD";

/// Selector of the recipient chips inside a row
pub const DEFAULT_RECIPIENT_SELECTOR: &str = ".g2";

/// Selectors identifying rows, senders and recipients in the host page markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RowMarkers {
    /// Ancestor element representing one email row
    pub list_item: String,

    /// Sender element inside a row (first match is used)
    pub sender: String,

    /// Recipient elements inside a row (all matches, document order)
    pub recipient: String,
}

impl Default for RowMarkers {
    fn default() -> Self {
        Self {
            list_item: DEFAULT_LIST_ITEM_SELECTOR.to_string(),
            sender: DEFAULT_SENDER_SELECTOR.to_string(),
            recipient: DEFAULT_RECIPIENT_SELECTOR.to_string(),
        }
    }
}

impl RowMarkers {
    /// Create markers with the default webmail selectors
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list item selector
    pub fn list_item(mut self, selector: impl Into<String>) -> Self {
        self.list_item = selector.into();
        self
    }

    /// Set the sender selector
    pub fn sender(mut self, selector: impl Into<String>) -> Self {
        self.sender = selector.into();
        self
    }

    /// Set the recipient selector
    pub fn recipient(mut self, selector: impl Into<String>) -> Self {
        self.recipient = selector.into();
        self
    }

    /// Parse markers from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| InspectorError::ConfigLoadFailed(format!("Invalid row markers: {}", e)))
    }

    /// Load markers from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            InspectorError::ConfigLoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}
