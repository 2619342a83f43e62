use crate::dom::query::QueryNode;
use crate::error::{InspectorError, Result};
use html5ever::Namespace;
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser as SelectorParser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorList};
use selectors::{Element, NthIndexCache, OpaqueElement};
use std::fmt;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed CSS selector group.
///
/// Parsing and matching go through the `selectors` crate with scraper's
/// selector implementation, so everything scraper accepts (combinators,
/// `:not()`, `:nth-child()`, `:has()`, attribute operators) works against
/// any [`QueryNode`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelector {
    source: String,
    selectors: SelectorList<Simple>,
}

impl ElementSelector {
    /// Parse a selector string
    pub fn parse(selector: &str) -> Result<Self> {
        let source = selector.trim();
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);

        let selectors = SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No).map_err(|e| {
            InspectorError::InvalidSelector(format!("'{}': {}", selector, SelectorErrorKind::from(e)))
        })?;

        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    /// The selector text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `node` matches any selector of the group
    pub fn matches<N: QueryNode>(&self, node: &N) -> bool {
        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matching::matches_selector_list(&self.selectors, &Matchable(node.clone()), &mut context)
    }
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Adapts a [`QueryNode`] to the element interface selector matching expects
#[derive(Clone)]
struct Matchable<N>(N);

impl<N: QueryNode> Matchable<N> {
    fn siblings(&self) -> (Vec<N>, Option<usize>) {
        let Some(parent) = self.0.parent() else {
            return (Vec::new(), None);
        };
        let siblings = parent.children();
        let me = self.0.opaque();
        let position = siblings.iter().position(|sibling| sibling.opaque() == me);
        (siblings, position)
    }
}

impl<N: QueryNode> fmt::Debug for Matchable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.describe())
    }
}

impl<N: QueryNode> Element for Matchable<N> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        self.0.opaque()
    }

    fn parent_element(&self) -> Option<Self> {
        self.0.parent().map(Matchable)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (mut siblings, position) = self.siblings();
        let index = position?.checked_sub(1)?;
        Some(Matchable(siblings.swap_remove(index)))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (mut siblings, position) = self.siblings();
        let index = position? + 1;
        (index < siblings.len()).then(|| Matchable(siblings.swap_remove(index)))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.children().into_iter().next().map(Matchable)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        self.0.tag_name().eq_ignore_ascii_case(&local_name.0)
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.0.tag_name().eq_ignore_ascii_case(&other.0.tag_name())
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Snapshot attributes carry no namespace
        let in_no_namespace = match ns {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Specific(url) => url.is_empty(),
        };
        in_no_namespace
            && self
                .0
                .get_attribute(&local_name.0)
                .is_some_and(|value| operation.eval_str(&value))
    }

    fn match_non_ts_pseudo_class(&self, _pc: &NonTSPseudoClass, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn match_pseudo_element(&self, _pe: &PseudoElement, _context: &mut MatchingContext<'_, Simple>) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        self.0.tag_name().eq_ignore_ascii_case("a") && self.0.get_attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.0
            .get_attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.0.get_attribute("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.0.children().is_empty() && self.0.text_content().is_none_or(|text| text.is_empty())
    }

    fn is_root(&self) -> bool {
        self.0.parent().is_none()
    }
}
