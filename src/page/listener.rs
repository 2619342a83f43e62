use crate::dom::QueryNode;
use crate::extract::{RowContacts, RowExtractor};
use crate::page::Page;
use crate::page::registry::ListenerId;
use crate::page::sink::LineSink;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Prefix of the diagnostic line written for every click
pub const CLICK_TARGET_PREFIX: &str = "Click target: ";

/// Rows a listener keeps by default before dropping the oldest
pub const DEFAULT_ROW_HISTORY: usize = 256;

/// Handle one click: log the raw target, then parse the enclosing list item if any
pub fn handle_click<N: QueryNode>(
    extractor: &RowExtractor,
    target: &N,
    sink: &dyn LineSink,
) -> Option<RowContacts> {
    sink.emit(&format!("{}{}", CLICK_TARGET_PREFIX, target.describe()));

    let list_item = extractor.find_list_item(target);
    if list_item.is_none() {
        log::debug!("Click outside any list item ({})", extractor.list_item_selector());
    }
    extractor.parse(list_item.as_ref(), sink)
}

/// Page-wide click subscription that reports the contacts of clicked email rows.
///
/// Created with [`ClickListener::attach`] and disposed with [`ClickListener::detach`].
/// Extracted rows are also kept for [`ClickListener::rows`]; only the most
/// recent `history_limit` are retained, older ones are dropped.
pub struct ClickListener {
    id: ListenerId,
    rows: Rc<RefCell<VecDeque<RowContacts>>>,
}

impl ClickListener {
    /// Register on the page's click event, keeping the last [`DEFAULT_ROW_HISTORY`] rows
    pub fn attach(page: &mut Page, extractor: RowExtractor, sink: Rc<dyn LineSink>) -> Self {
        Self::attach_with_history(page, extractor, sink, DEFAULT_ROW_HISTORY)
    }

    /// Register on the page's click event, keeping at most `history_limit` rows.
    /// A limit of 0 keeps none; output to the sink is unaffected.
    pub fn attach_with_history(
        page: &mut Page,
        extractor: RowExtractor,
        sink: Rc<dyn LineSink>,
        history_limit: usize,
    ) -> Self {
        let rows = Rc::new(RefCell::new(VecDeque::new()));
        let history = Rc::clone(&rows);

        let id = page.add_click_listener(move |event, document| {
            let Some(target) = document.node(event.target) else {
                log::warn!("Click target {:?} is not part of the document", event.target);
                return;
            };
            if let Some(contacts) = handle_click(&extractor, &target, sink.as_ref()) {
                if history_limit == 0 {
                    return;
                }
                let mut history = history.borrow_mut();
                if history.len() == history_limit {
                    history.pop_front();
                }
                history.push_back(contacts);
            }
        });
        log::debug!("Attached click listener {:?}", id);

        Self { id, rows }
    }

    /// Registration handle on the page
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Retained rows, oldest first
    pub fn rows(&self) -> Vec<RowContacts> {
        self.rows.borrow().iter().cloned().collect()
    }

    /// Drain the retained rows
    pub fn take_rows(&self) -> Vec<RowContacts> {
        self.rows.borrow_mut().drain(..).collect()
    }

    /// Unregister from the page. Returns false if it was already removed.
    pub fn detach(self, page: &mut Page) -> bool {
        let removed = page.remove_click_listener(self.id);
        log::debug!("Detached click listener {:?} (registered: {})", self.id, removed);
        removed
    }
}
