use crate::dom::element::ElementNode;
use crate::dom::query::{OpaqueElement, QueryNode};
use crate::error::{InspectorError, Result};
use indexmap::IndexMap;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an element inside a [`DomTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document order
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    /// Element data; its `children` field is always empty, structure lives in `children` below
    element: ElementNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// JSON snapshot: every element once, in document order, pointing at its parent
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotNode {
    /// Index of the parent in `nodes`, `None` for the root
    #[serde(default)]
    parent: Option<usize>,

    tag_name: String,

    #[serde(default)]
    attributes: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
}

/// The DOM of a page, stored as an arena with parent links.
///
/// Node ids are assigned in document order, so the root is always id 0 and
/// a pre-order walk visits ids in increasing order. Building, walking and
/// serializing never recurse, so document depth is only bounded by memory.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<TreeNode>,
}

impl DomTree {
    /// Build a tree from a nested element snapshot
    pub fn from_root(root: ElementNode) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut stack = vec![(root, None)];
        while let Some((mut element, parent)) = stack.pop() {
            let children = std::mem::take(&mut element.children);
            let id = tree.push(element, parent);
            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }
        tree
    }

    /// Parse the JSON snapshot format written by [`DomTree::to_json`] and the
    /// in-page snapshot script.
    ///
    /// Nodes may come in any order as long as each parent precedes its
    /// children; ids are renumbered into document order.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| InspectorError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;

        if snapshot.nodes.is_empty() {
            return Err(InspectorError::DomParseFailed("DOM snapshot has no nodes".to_string()));
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); snapshot.nodes.len()];
        for (index, node) in snapshot.nodes.iter().enumerate() {
            match (index, node.parent) {
                (0, None) => {}
                (0, Some(_)) => {
                    return Err(InspectorError::DomParseFailed("Snapshot root has a parent".to_string()));
                }
                (_, Some(parent)) if parent < index => children[parent].push(index),
                (_, parent) => {
                    return Err(InspectorError::DomParseFailed(format!(
                        "Snapshot node {} has invalid parent {:?}",
                        index, parent
                    )));
                }
            }
        }

        let mut elements: Vec<Option<ElementNode>> = snapshot
            .nodes
            .into_iter()
            .map(|node| {
                Some(ElementNode {
                    tag_name: node.tag_name,
                    attributes: node.attributes,
                    text_content: node.text_content,
                    children: Vec::new(),
                })
            })
            .collect();

        let mut tree = Self {
            nodes: Vec::with_capacity(elements.len()),
        };
        let mut stack = vec![(0, None)];
        while let Some((index, parent)) = stack.pop() {
            let element = elements[index].take().unwrap_or_default();
            let id = tree.push(element, parent);
            stack.extend(children[index].iter().rev().map(|&child| (child, Some(id))));
        }
        Ok(tree)
    }

    /// Parse an HTML document. The root of the tree is the `<html>` element.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            log::debug!("HTML parsed with {} recoverable errors", document.errors.len());
        }

        let mut tree = Self { nodes: Vec::new() };
        let mut stack = vec![(document.root_element(), None)];
        while let Some((element, parent)) = stack.pop() {
            let id = tree.push(html_element(element), parent);
            let children: Vec<_> = element.children().filter_map(ElementRef::wrap).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }
        tree
    }

    fn push(&mut self, element: ElementNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            element,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Id of the root element
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Handle to the root element
    pub fn document(&self) -> NodeRef<'_> {
        NodeRef { tree: self, id: self.root() }
    }

    /// Handle to an element, `None` if the id is not part of this tree
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.contains(id).then_some(NodeRef { tree: self, id })
    }

    /// Check whether an id belongs to this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Element data for a node (without children)
    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.nodes.get(id.0).map(|n| &n.element)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of the subtree rooted at `id`, in document order
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        order
    }

    /// Rebuild the nested snapshot rooted at `id`
    pub fn to_element(&self, id: NodeId) -> Option<ElementNode> {
        if !self.contains(id) {
            return None;
        }

        // Children have larger ids than their parent, so build bottom-up
        let mut built: Vec<Option<ElementNode>> = vec![None; self.nodes.len()];
        for current in self.subtree(id).into_iter().rev() {
            let node = &self.nodes[current.0];
            let mut element = node.element.clone();
            element.children = node.children.iter().filter_map(|child| built[child.0].take()).collect();
            built[current.0] = Some(element);
        }
        built[id.0].take()
    }

    /// Convert the DOM tree to the JSON snapshot format
    pub fn to_json(&self) -> Result<String> {
        if self.nodes.is_empty() {
            return Err(InspectorError::DomParseFailed("Empty DOM tree".to_string()));
        }

        let snapshot = Snapshot {
            nodes: self
                .nodes
                .iter()
                .map(|node| SnapshotNode {
                    parent: node.parent.map(|parent| parent.0),
                    tag_name: node.element.tag_name.clone(),
                    attributes: node.element.attributes.clone(),
                    text_content: node.element.text_content.clone(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| InspectorError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Remove script, style and noscript subtrees. Node ids are reassigned.
    pub fn simplify(&mut self) {
        let mut kept = Self { nodes: Vec::new() };
        let mut stack = vec![(self.root(), None)];
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if node.element.is_non_content() {
                continue;
            }
            let new_id = kept.push(node.element.clone(), parent);
            stack.extend(node.children.iter().rev().map(|&child| (child, Some(new_id))));
        }
        *self = kept;
    }
}

/// Element data of one parsed HTML element, without its children
fn html_element(element: ElementRef<'_>) -> ElementNode {
    let mut node = ElementNode::new(element.value().name());
    for (key, value) in element.value().attrs() {
        node.add_attribute(key, value);
    }

    let text: String = element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .collect();
    let text = text.trim();
    if !text.is_empty() {
        node.text_content = Some(text.to_string());
    }
    node
}

/// Borrowed handle to one element of a [`DomTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Id of the element
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tree the element belongs to
    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// Element data (without children)
    pub fn element(&self) -> &'a ElementNode {
        &self.tree.nodes[self.id.0].element
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.0)
            .field("element", &self.element().to_simple_string())
            .finish()
    }
}

impl QueryNode for NodeRef<'_> {
    fn tag_name(&self) -> String {
        self.element().tag_name.clone()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.element().get_attribute(name).map(str::to_string)
    }

    fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| NodeRef { tree: self.tree, id })
    }

    fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| NodeRef { tree: self.tree, id })
            .collect()
    }

    fn describe(&self) -> String {
        self.element().to_simple_string()
    }

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(&self.tree.nodes[self.id.0])
    }

    fn text_content(&self) -> Option<String> {
        self.element().text_content.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        let mut root = ElementNode::new("body");

        let mut header = ElementNode::new("header");
        header.add_child(ElementNode::new("button").with_attribute("id", "compose").with_text("Compose"));

        let mut main = ElementNode::new("main");
        main.add_child(ElementNode::new("div").with_attribute("role", "listitem"));
        main.add_child(ElementNode::new("div").with_attribute("role", "listitem"));

        root.add_child(header);
        root.add_child(main);
        root
    }

    #[test]
    fn test_dom_tree_creation() {
        let tree = DomTree::from_root(create_test_tree());

        assert_eq!(tree.element(tree.root()).unwrap().tag_name, "body");
        assert_eq!(tree.children(tree.root()).len(), 2);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn test_ids_follow_document_order() {
        let tree = DomTree::from_root(create_test_tree());
        let tags: Vec<_> = (0..tree.count_elements())
            .map(|i| tree.element(NodeId(i)).unwrap().tag_name.clone())
            .collect();
        assert_eq!(tags, vec!["body", "header", "button", "main", "div", "div"]);
        assert_eq!(tree.parent(NodeId(2)), Some(NodeId(1)));
        assert_eq!(tree.parent(NodeId(5)), Some(NodeId(3)));
    }

    #[test]
    fn test_stored_elements_have_no_nested_children() {
        let tree = DomTree::from_root(create_test_tree());
        assert!(tree.element(tree.root()).unwrap().children.is_empty());
    }

    #[test]
    fn test_node_lookup() {
        let tree = DomTree::from_root(create_test_tree());
        assert!(tree.node(NodeId(5)).is_some());
        assert!(tree.node(NodeId(6)).is_none());
        assert!(!tree.contains(NodeId(99)));
        assert!(tree.children(NodeId(99)).is_empty());
    }

    #[test]
    fn test_count_elements() {
        let tree = DomTree::from_root(create_test_tree());
        assert_eq!(tree.count_elements(), 6);
    }

    #[test]
    fn test_json_round_trip_preserves_structure() {
        let original = create_test_tree();
        let tree = DomTree::from_root(original.clone());
        let json = tree.to_json().unwrap();

        assert!(json.contains("\"tag_name\": \"body\""));
        assert!(json.contains("Compose"));

        let reparsed = DomTree::from_json(&json).unwrap();
        assert_eq!(reparsed.to_element(reparsed.root()), Some(original));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DomTree::from_json("{\"tag\": 1}").unwrap_err();
        assert!(matches!(err, InspectorError::DomParseFailed(_)));
    }

    #[test]
    fn test_snapshot_is_flat() {
        let json = DomTree::from_root(create_test_tree()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let nodes = value["nodes"].as_array().unwrap();

        assert_eq!(nodes.len(), 6);
        assert!(nodes[0]["parent"].is_null());
        assert_eq!(nodes[2]["parent"], 1);
        assert_eq!(nodes[5]["parent"], 3);
        assert!(nodes.iter().all(|node| node.get("children").is_none()));
    }

    #[test]
    fn test_from_json_validates_parents() {
        for bad in [
            r#"{"nodes": []}"#,
            r#"{"nodes": [{"parent": 0, "tag_name": "html"}]}"#,
            r#"{"nodes": [{"tag_name": "html"}, {"tag_name": "body"}]}"#,
            r#"{"nodes": [{"tag_name": "html"}, {"parent": 1, "tag_name": "body"}]}"#,
            r#"{"nodes": [{"tag_name": "html"}, {"parent": 5, "tag_name": "body"}]}"#,
        ] {
            assert!(
                matches!(DomTree::from_json(bad), Err(InspectorError::DomParseFailed(_))),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn test_from_json_renumbers_into_document_order() {
        // html > (body > p), head, listed breadth-first
        let json = r#"{"nodes": [
            {"tag_name": "html"},
            {"parent": 0, "tag_name": "body"},
            {"parent": 0, "tag_name": "head"},
            {"parent": 1, "tag_name": "p"}
        ]}"#;
        let tree = DomTree::from_json(json).unwrap();
        let tags: Vec<_> = (0..tree.count_elements())
            .map(|i| tree.element(NodeId(i)).unwrap().tag_name.clone())
            .collect();
        assert_eq!(tags, vec!["html", "body", "p", "head"]);
        assert_eq!(tree.parent(NodeId(2)), Some(NodeId(1)));
    }

    fn nested_html(depth: usize) -> String {
        format!(
            "<html><body>{}<div role=\"listitem\"><span class=\"gD\" name=\"Alice\" email=\"alice@x.com\"></span></div>{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        )
    }

    #[test]
    fn test_deep_snapshot_round_trip() {
        let tree = DomTree::from_html(&nested_html(250));
        let reparsed = DomTree::from_json(&tree.to_json().unwrap()).unwrap();

        assert_eq!(reparsed.count_elements(), tree.count_elements());
        let span = reparsed.node(NodeId(reparsed.count_elements() - 1)).unwrap();
        assert_eq!(span.get_attribute("email").as_deref(), Some("alice@x.com"));
        assert_eq!(span.parent().unwrap().get_attribute("role").as_deref(), Some("listitem"));
    }

    #[test]
    fn test_from_html_very_deep_document() {
        let tree = DomTree::from_html(&nested_html(3000));

        // html, head, body, the wrappers, the row and the span
        assert_eq!(tree.count_elements(), 3000 + 5);
        let span = tree.node(NodeId(tree.count_elements() - 1)).unwrap();
        assert_eq!(span.tag_name(), "span");

        let mut depth = 0;
        let mut cursor = span.parent();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent();
        }
        assert_eq!(depth, 3000 + 3);
    }

    #[test]
    fn test_to_element_very_deep_tree() {
        let tree = DomTree::from_html(&nested_html(3000));
        let body = tree.children(tree.root())[1];
        let element = tree.to_element(body).unwrap();
        assert_eq!(element.tag_name, "body");
        assert_eq!(element.children.len(), 1);
        // Hand the nested value back to the arena so it is taken apart iteratively
        assert_eq!(DomTree::from_root(element).count_elements(), 3000 + 3);
    }

    #[test]
    fn test_from_html() {
        let tree = DomTree::from_html(
            r#"<html><body><div ROLE="listitem" class="zA"><span class="gD" name="Alice" email="alice@x.com">Alice</span></div></body></html>"#,
        );

        let root = tree.document();
        assert_eq!(root.tag_name(), "html");

        let span = tree
            .node(NodeId(tree.count_elements() - 1))
            .unwrap();
        assert_eq!(span.tag_name(), "span");
        assert_eq!(span.get_attribute("email").as_deref(), Some("alice@x.com"));
        assert_eq!(span.element().text_content.as_deref(), Some("Alice"));

        let row = span.parent().unwrap();
        assert_eq!(row.get_attribute("role").as_deref(), Some("listitem"));
    }

    #[test]
    fn test_simplify() {
        let root = ElementNode::new("body")
            .with_child(ElementNode::new("p").with_text("Content"))
            .with_child(ElementNode::new("script").with_text("alert('test')"))
            .with_child(ElementNode::new("style").with_text(".test {}"))
            .with_child(
                ElementNode::new("div")
                    .with_child(ElementNode::new("NOSCRIPT").with_child(ElementNode::new("img")))
                    .with_child(ElementNode::new("span")),
            );

        let mut tree = DomTree::from_root(root);
        tree.simplify();

        let tags: Vec<_> = (0..tree.count_elements())
            .map(|i| tree.element(NodeId(i)).unwrap().tag_name.clone())
            .collect();
        assert_eq!(tags, vec!["body", "p", "div", "span"]);
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(2)));
    }

    #[test]
    fn test_node_ref_equality_is_per_tree() {
        let a = DomTree::from_root(create_test_tree());
        let b = a.clone();
        assert_eq!(a.document(), a.document());
        assert_ne!(a.document(), b.document());
    }
}
