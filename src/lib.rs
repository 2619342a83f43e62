//! # inbox-inspector
//!
//! Report who sent and who received the email row a user clicks on in a
//! webmail page.
//!
//! A click anywhere inside a conversation row (`div[role='listitem']`) walks
//! up to that row, reads the `name` and `email` attributes of its sender chip
//! (`.gD`) and recipient chips (`.g2`), and writes one console line per
//! contact:
//!
//! ```text
//! Sender: Alice <alice@x.com>
//! Recipient: Bob <bob@x.com>
//! Recipient: Carol <carol@x.com>
//! ```
//!
//! ## Library Usage
//!
//! ```rust
//! use inbox_inspector::{ClickListener, DomTree, MemorySink, Page, RowExtractor};
//! use std::rc::Rc;
//!
//! # fn main() -> inbox_inspector::Result<()> {
//! let html = r#"
//!     <div role="listitem">
//!         <span class="gD" name="Alice" email="alice@x.com">Alice</span>
//!         <span class="g2" name="Bob" email="bob@x.com">Bob</span>
//!     </div>"#;
//!
//! let mut page = Page::new(DomTree::from_html(html));
//! let sink = MemorySink::new();
//! let listener = ClickListener::attach(&mut page, RowExtractor::default(), Rc::new(sink.clone()));
//!
//! page.click("span.g2")?;
//!
//! assert_eq!(sink.lines()[1], "Sender: Alice <alice@x.com>");
//! assert_eq!(sink.lines()[2], "Recipient: Bob <bob@x.com>");
//! listener.detach(&mut page);
//! # Ok(())
//! # }
//! ```
//!
//! ### Capturing a live page
//!
//! ```rust,no_run
//! use inbox_inspector::{BrowserSession, LaunchOptions};
//!
//! # fn main() -> inbox_inspector::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default().headless(false))?;
//! session.navigate("https://mail.google.com/")?;
//! let dom = session.snapshot()?;
//! println!("Captured {} elements", dom.count_elements());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: element snapshots, the arena tree, selectors and the query capability
//! - [`extract`]: row markers, contacts and the row extractor
//! - [`page`]: the page model, click listeners and output sinks
//! - [`browser`]: Chrome session for capturing live pages
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod extract;
pub mod page;
pub mod utils;

pub use browser::{BrowserSession, LaunchOptions};
pub use dom::{DomTree, ElementNode, ElementSelector, NodeId, NodeRef, QueryNode};
pub use error::{InspectorError, Result};
pub use extract::{Contact, RowContacts, RowExtractor, RowMarkers};
pub use page::{ClickListener, ConsoleSink, LineSink, MemorySink, Page, StdoutSink};
