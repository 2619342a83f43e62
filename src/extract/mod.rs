//! Sender and recipient extraction from email list rows

pub mod contact;
pub mod extractor;
pub mod markers;

pub use contact::{Contact, RowContacts, EMAIL_ATTRIBUTE, NAME_ATTRIBUTE};
pub use extractor::RowExtractor;
pub use markers::RowMarkers;
