use crate::dom::QueryNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute carrying a contact's display name
pub const NAME_ATTRIBUTE: &str = "name";

/// Attribute carrying a contact's email address
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Display name and address read off a sender or recipient element.
///
/// Missing elements and attributes become empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Read `name` and `email` from an element, if there is one
    pub fn from_node<N: QueryNode>(node: Option<&N>) -> Self {
        let Some(node) = node else {
            return Self::default();
        };
        Self {
            name: node.get_attribute(NAME_ATTRIBUTE).unwrap_or_default(),
            email: node.get_attribute(EMAIL_ATTRIBUTE).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Contacts found in one email row
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowContacts {
    pub sender: Contact,
    pub recipients: Vec<Contact>,
}

impl RowContacts {
    /// Console lines for this row: one sender line, then one line per recipient
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(format!("Sender: {}", self.sender))
            .chain(self.recipients.iter().map(|r| format!("Recipient: {}", r)))
            .collect()
    }
}
