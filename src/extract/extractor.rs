use crate::dom::{ElementSelector, QueryNode};
use crate::error::Result;
use crate::extract::contact::{Contact, RowContacts};
use crate::extract::markers::RowMarkers;
use crate::page::sink::LineSink;

/// Pulls sender and recipient contacts out of an email list row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowExtractor {
    list_item: ElementSelector,
    sender: ElementSelector,
    recipient: ElementSelector,
}

impl Default for RowExtractor {
    /// Extractor for the default webmail markup: `div[role='listitem']`, `.gD`, `.g2`
    fn default() -> Self {
        Self::new(&RowMarkers::default()).expect("Default row markers are valid selectors")
    }
}

impl RowExtractor {
    /// Build an extractor from marker selectors
    pub fn new(markers: &RowMarkers) -> Result<Self> {
        Ok(Self {
            list_item: ElementSelector::parse(&markers.list_item)?,
            sender: ElementSelector::parse(&markers.sender)?,
            recipient: ElementSelector::parse(&markers.recipient)?,
        })
    }

    pub fn list_item_selector(&self) -> &ElementSelector {
        &self.list_item
    }

    pub fn sender_selector(&self) -> &ElementSelector {
        &self.sender
    }

    pub fn recipient_selector(&self) -> &ElementSelector {
        &self.recipient
    }

    /// Nearest ancestor-or-self of `target` that is a list item
    pub fn find_list_item<N: QueryNode>(&self, target: &N) -> Option<N> {
        target.closest(&self.list_item)
    }

    /// Read the sender and recipients below a list item
    pub fn extract<N: QueryNode>(&self, list_item: &N) -> RowContacts {
        let sender = list_item.query_selector(&self.sender);
        if sender.is_none() {
            log::debug!("No sender element matching {} in {}", self.sender, list_item.describe());
        }

        RowContacts {
            sender: Contact::from_node(sender.as_ref()),
            recipients: list_item
                .query_selector_all(&self.recipient)
                .iter()
                .map(|node| Contact::from_node(Some(node)))
                .collect(),
        }
    }

    /// Emit the contact lines of a list item. An absent list item emits nothing.
    pub fn parse<N: QueryNode>(&self, list_item: Option<&N>, sink: &dyn LineSink) -> Option<RowContacts> {
        let list_item = list_item?;
        let contacts = self.extract(list_item);
        for line in contacts.lines() {
            sink.emit(&line);
        }
        Some(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomTree, ElementNode, NodeRef};
    use crate::error::InspectorError;
    use crate::page::sink::MemorySink;

    fn contact(class: &str, name: &str, email: &str) -> ElementNode {
        ElementNode::new("span")
            .with_attribute("class", class)
            .with_attribute("name", name)
            .with_attribute("email", email)
    }

    fn alice_row() -> DomTree {
        let row = ElementNode::new("div")
            .with_attribute("role", "listitem")
            .with_child(ElementNode::new("h3").with_child(contact("gD", "Alice", "alice@x.com")))
            .with_child(
                ElementNode::new("div")
                    .with_child(contact("g2", "Bob", "bob@x.com"))
                    .with_child(contact("g2", "Carol", "carol@x.com")),
            );
        DomTree::from_root(ElementNode::new("body").with_child(row))
    }

    fn row_of(tree: &DomTree) -> NodeRef<'_> {
        tree.document().children()[0]
    }

    #[test]
    fn test_alice_bob_carol() {
        let tree = alice_row();
        let sink = MemorySink::new();
        let extractor = RowExtractor::default();

        extractor.parse(Some(&row_of(&tree)), &sink);

        assert_eq!(
            sink.lines(),
            vec![
                "Sender: Alice <alice@x.com>",
                "Recipient: Bob <bob@x.com>",
                "Recipient: Carol <carol@x.com>",
            ]
        );
    }

    #[test]
    fn test_parse_none_emits_nothing() {
        let sink = MemorySink::new();
        let result = RowExtractor::default().parse(None::<&NodeRef<'_>>, &sink);
        assert!(result.is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_sender_renders_empty_fields() {
        let row = ElementNode::new("div")
            .with_attribute("role", "listitem")
            .with_child(contact("g2", "Bob", "bob@x.com"));
        let tree = DomTree::from_root(row);
        let sink = MemorySink::new();

        RowExtractor::default().parse(Some(&tree.document()), &sink);

        assert_eq!(sink.lines(), vec!["Sender:  <>", "Recipient: Bob <bob@x.com>"]);
    }

    #[test]
    fn test_missing_attributes_never_render_undefined() {
        let row = ElementNode::new("div")
            .with_attribute("role", "listitem")
            .with_child(ElementNode::new("span").with_attribute("class", "gD").with_attribute("name", "Alice"))
            .with_child(ElementNode::new("span").with_attribute("class", "g2"));
        let tree = DomTree::from_root(row);
        let sink = MemorySink::new();

        RowExtractor::default().parse(Some(&tree.document()), &sink);

        let lines = sink.lines();
        assert_eq!(lines, vec!["Sender: Alice <>", "Recipient:  <>"]);
        assert!(lines.iter().all(|l| !l.contains("undefined") && !l.contains("null")));
    }

    #[test]
    fn test_first_sender_only() {
        let row = ElementNode::new("div")
            .with_child(contact("gD", "Alice", "alice@x.com"))
            .with_child(contact("gD", "Mallory", "mallory@x.com"));
        let tree = DomTree::from_root(row);

        let contacts = RowExtractor::default().extract(&tree.document());
        assert_eq!(contacts.sender, Contact::new("Alice", "alice@x.com"));
        assert!(contacts.recipients.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let tree = alice_row();
        let extractor = RowExtractor::default();
        let row = row_of(&tree);

        let first = MemorySink::new();
        let second = MemorySink::new();
        extractor.parse(Some(&row), &first);
        extractor.parse(Some(&row), &second);

        assert_eq!(first.lines(), second.lines());
    }

    #[test]
    fn test_find_list_item() {
        let tree = alice_row();
        let extractor = RowExtractor::default();
        let carol = tree
            .document()
            .query_selector_all(extractor.recipient_selector())
            .pop()
            .unwrap();

        assert_eq!(extractor.find_list_item(&carol), Some(row_of(&tree)));
        assert!(extractor.find_list_item(&tree.document()).is_none());
    }

    #[test]
    fn test_default_matches_parsed_markers() {
        let parsed = RowExtractor::new(&RowMarkers::default()).unwrap();
        let tree = alice_row();
        assert_eq!(
            parsed.extract(&row_of(&tree)),
            RowExtractor::default().extract(&row_of(&tree))
        );
        assert_eq!(parsed, RowExtractor::default());
    }

    #[test]
    fn test_default_follows_marker_constants() {
        use crate::extract::markers::{
            DEFAULT_LIST_ITEM_SELECTOR, DEFAULT_RECIPIENT_SELECTOR, DEFAULT_SENDER_SELECTOR,
        };

        let extractor = RowExtractor::default();
        assert_eq!(extractor.list_item_selector().as_str(), DEFAULT_LIST_ITEM_SELECTOR);
        assert_eq!(extractor.sender_selector().as_str(), DEFAULT_SENDER_SELECTOR);
        assert_eq!(extractor.recipient_selector().as_str(), DEFAULT_RECIPIENT_SELECTOR);
    }

    #[test]
    fn test_custom_markers() {
        let markers = RowMarkers::new().list_item("li.thread").sender("b.from").recipient("i.to");
        let extractor = RowExtractor::new(&markers).unwrap();

        let row = ElementNode::new("li")
            .with_attribute("class", "thread")
            .with_child(contact("from", "Dan", "dan@x.com"))
            .with_child(
                ElementNode::new("b")
                    .with_attribute("class", "from")
                    .with_attribute("name", "Erin")
                    .with_attribute("email", "erin@x.com"),
            )
            .with_child(ElementNode::new("i").with_attribute("class", "to").with_attribute("name", "Finn"));
        let tree = DomTree::from_root(row);

        let contacts = extractor.extract(&tree.document());
        assert_eq!(contacts.sender, Contact::new("Erin", "erin@x.com"));
        assert_eq!(contacts.recipients, vec![Contact::new("Finn", "")]);
    }

    #[test]
    fn test_invalid_markers() {
        let err = RowExtractor::new(&RowMarkers::new().sender("span[")).unwrap_err();
        assert!(matches!(err, InspectorError::InvalidSelector(_)));
    }
}
