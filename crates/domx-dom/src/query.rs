//! Selector queries
//!
//! querySelectorAll over the arena. Parsing and matching are done by the
//! `selectors` crate; this module supplies the selector implementation and
//! the `selectors::Element` view of an arena element.

use std::fmt;

use cssparser::{CowRcStr, ParseError, ParserInput, SourceLocation, ToCss};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{self, ParseRelative, Selector, SelectorParseErrorKind};
use selectors::{Element, OpaqueElement};

use crate::{DomError, DomResult, DomTree, ElementData, Node, NodeData, NodeId};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// ============================================================================
// Selector implementation
// ============================================================================

/// Selector implementation for the arena DOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomSelectors;

impl parser::SelectorImpl for DomSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespaceUrl = CssIdent;
    type NamespacePrefix = CssIdent;
    type BorrowedNamespaceUrl = CssIdent;
    type BorrowedLocalName = CssIdent;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

/// Quoted string in a selector (attribute values)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssString(pub String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// Identifier in a selector (names, ids, classes, namespaces)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssIdent(pub String);

impl From<&str> for CssIdent {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl ToCss for CssIdent {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssIdent {
    // FNV-1a
    fn precomputed_hash(&self) -> u32 {
        self.0.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
        })
    }
}

/// State pseudo-classes backed by attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:any-link` and `:link`
    AnyLink,
    Checked,
    Disabled,
    Enabled,
}

impl parser::NonTSPseudoClass for PseudoClass {
    type Impl = DomSelectors;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for PseudoClass {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(match self {
            PseudoClass::AnyLink => ":any-link",
            PseudoClass::Checked => ":checked",
            PseudoClass::Disabled => ":disabled",
            PseudoClass::Enabled => ":enabled",
        })
    }
}

/// Pseudo-elements never match DOM nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = DomSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

struct SelectorParser;

impl<'i> parser::Parser<'i> for SelectorParser {
    type Impl = DomSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_is_and_where(&self) -> bool {
        true
    }

    fn parse_has(&self) -> bool {
        true
    }

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<PseudoClass, ParseError<'i, Self::Error>> {
        match name.to_ascii_lowercase().as_str() {
            "any-link" | "link" => Ok(PseudoClass::AnyLink),
            "checked" => Ok(PseudoClass::Checked),
            "disabled" => Ok(PseudoClass::Disabled),
            "enabled" => Ok(PseudoClass::Enabled),
            _ => Err(location.new_custom_error(
                SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
            )),
        }
    }
}

// ============================================================================
// Element view
// ============================================================================

/// An element of a `DomTree`, as seen by the selector matcher
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    node: &'a Node,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let data = node.as_element()?;
        Some(Self { tree, id, node, data })
    }

    /// First element reached by following `step` from `start`
    fn walk(&self, start: NodeId, step: impl Fn(&Node) -> NodeId) -> Option<Self> {
        let mut cur = start;
        while cur.is_valid() {
            let node = self.tree.get(cur)?;
            if node.is_element() {
                return Self::new(self.tree, cur);
            }
            cur = step(node);
        }
        None
    }

    fn is_form_control(&self) -> bool {
        matches!(
            self.data.name.as_str(),
            "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
        )
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {:?}", self.data.name, self.id)
    }
}

impl Element for ElementRef<'_> {
    type Impl = DomSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node)
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.id)
            .and_then(|parent| Self::new(self.tree, parent))
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
        self.walk(self.node.prev_sibling, |n| n.prev_sibling)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.walk(self.node.next_sibling, |n| n.next_sibling)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.walk(self.node.first_child, |n| n.next_sibling)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssIdent) -> bool {
        self.data.name == local_name.0
    }

    fn has_namespace(&self, ns: &CssIdent) -> bool {
        ns.0.is_empty() || ns.0 == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.name == other.data.name
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssIdent>,
        local_name: &CssIdent,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if matches!(ns, NamespaceConstraint::Specific(url) if !url.0.is_empty()) {
            return false;
        }
        self.data
            .get_attr(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &PseudoClass,
        _context: &mut MatchingContext<'_, DomSelectors>,
    ) -> bool {
        let has = |name: &str| self.data.get_attr(name).is_some();
        match pc {
            PseudoClass::AnyLink => self.is_link(),
            PseudoClass::Checked => match self.data.name.as_str() {
                "input" => has("checked"),
                "option" => has("selected"),
                _ => false,
            },
            PseudoClass::Disabled => self.is_form_control() && has("disabled"),
            PseudoClass::Enabled => self.is_form_control() && !has("disabled"),
        }
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, DomSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.name.as_str(), "a" | "area" | "link") && self.data.get_attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.data.name == "slot"
    }

    fn has_id(&self, id: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .get_attr("id")
            .is_some_and(|value| case_sensitivity.eq(value.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssIdent, case_sensitivity: CaseSensitivity) -> bool {
        self.data.get_attr("class").is_some_and(|value| {
            value
                .split_ascii_whitespace()
                .any(|token| case_sensitivity.eq(token.as_bytes(), name.0.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssIdent) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
        None
    }

    fn is_part(&self, _name: &CssIdent) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.tree.children(self.id).any(|(_, child)| match &child.data {
            NodeData::Element(_) => true,
            NodeData::Text(text) => !text.is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        self.tree
            .parent(self.id)
            .and_then(|parent| self.tree.get(parent))
            .is_some_and(|parent| matches!(parent.data, NodeData::Document))
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

// ============================================================================
// Selector lists
// ============================================================================

/// Parsed selector list
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<Selector<DomSelectors>>,
}

impl SelectorList {
    /// Parse a selector list. Unsupported or malformed input is an error.
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut parser_input = ParserInput::new(input);
        let mut parser = cssparser::Parser::new(&mut parser_input);
        let list = parser::SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No)
            .map_err(|err| {
                tracing::debug!("invalid selector {:?}: {:?}", input, err.kind);
                DomError::InvalidSelector(input.to_string())
            })?;
        Ok(Self {
            selectors: list.slice().iter().cloned().collect(),
        })
    }

    /// `Element.matches`
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = ElementRef::new(tree, node) else {
            return false;
        };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.selectors
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }

    /// Matching descendants of `scope`, in document order
    pub fn query_all(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope)
            .filter(|&id| self.matches(tree, id))
            .collect()
    }

    /// First matching descendant of `scope`
    pub fn query_first(&self, tree: &DomTree, scope: NodeId) -> Option<NodeId> {
        tree.descendants(scope).find(|&id| self.matches(tree, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeOperations;

    /// body > div#main.box > (p.intro, p[data-x="a,b"], span)
    fn sample() -> (DomTree, [NodeId; 5]) {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let div = tree.create_element("div");
        let p1 = tree.create_element("p");
        let p2 = tree.create_element("p");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), body).unwrap();
        tree.append_child(body, div).unwrap();
        tree.append_child(div, p1).unwrap();
        tree.append_child(div, p2).unwrap();
        tree.append_child(div, span).unwrap();
        tree.set_attribute(div, "id", "main").unwrap();
        tree.set_attribute(div, "class", "box wide").unwrap();
        tree.set_attribute(p1, "class", "intro").unwrap();
        tree.set_attribute(p2, "data-x", "a,b").unwrap();
        (tree, [body, div, p1, p2, span])
    }

    fn query(tree: &DomTree, sel: &str) -> Vec<NodeId> {
        SelectorList::parse(sel).unwrap().query_all(tree, tree.root())
    }

    #[test]
    fn test_simple_selectors() {
        let (tree, [_, div, p1, p2, span]) = sample();
        assert_eq!(query(&tree, "p"), vec![p1, p2]);
        assert_eq!(query(&tree, "P"), vec![p1, p2]);
        assert_eq!(query(&tree, "#main"), vec![div]);
        assert_eq!(query(&tree, ".intro"), vec![p1]);
        assert_eq!(query(&tree, "div.box.wide"), vec![div]);
        assert_eq!(query(&tree, "span, p.intro"), vec![p1, span]);
        assert!(query(&tree, ".missing").is_empty());
    }

    #[test]
    fn test_attribute_selectors() {
        let (tree, [_, div, _, p2, _]) = sample();
        assert_eq!(query(&tree, "[data-x]"), vec![p2]);
        assert_eq!(query(&tree, r#"[data-x="a,b"]"#), vec![p2]);
        assert_eq!(query(&tree, "[class~=wide]"), vec![div]);
        assert_eq!(query(&tree, "[id^=ma]"), vec![div]);
        assert_eq!(query(&tree, "[id$=in]"), vec![div]);
        assert_eq!(query(&tree, "[id*=ai]"), vec![div]);
    }

    #[test]
    fn test_combinators() {
        let (tree, [body, _, p1, p2, span]) = sample();
        assert_eq!(query(&tree, "body p"), vec![p1, p2]);
        assert_eq!(query(&tree, "body > p"), Vec::<NodeId>::new());
        assert_eq!(query(&tree, "body>*"), query(&tree, "#main"));
        assert_eq!(query(&tree, ".intro + p"), vec![p2]);
        assert_eq!(query(&tree, ".intro ~ span"), vec![span]);
        assert_eq!(query(&tree, "* > body"), Vec::<NodeId>::new());
        assert!(SelectorList::parse("body").unwrap().matches(&tree, body));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let (tree, [body, div, p1, p2, span]) = sample();
        assert_eq!(query(&tree, "p:first-child"), vec![p1]);
        assert_eq!(query(&tree, "#main > :nth-child(2)"), vec![p2]);
        assert_eq!(query(&tree, "#main > :last-child"), vec![span]);
        assert_eq!(query(&tree, "p:not(.intro)"), vec![p2]);
        assert_eq!(query(&tree, "p:first-of-type"), vec![p1]);
        assert_eq!(query(&tree, ":is(span, .intro)"), vec![p1, span]);
        assert_eq!(query(&tree, "div:has(> span)"), vec![div]);
        assert_eq!(query(&tree, ":root"), vec![body]);
        assert_eq!(query(&tree, "span:empty"), vec![span]);
    }

    #[test]
    fn test_escaped_identifiers() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.append_child(tree.root(), a).unwrap();
        tree.set_attribute(a, "class", "w-1/2").unwrap();
        tree.set_attribute(a, "id", "1st").unwrap();

        assert_eq!(query(&tree, r".w-1\/2"), vec![a]);
        assert_eq!(query(&tree, r"#\31 st"), vec![a]);
    }

    #[test]
    fn test_state_pseudo_classes() {
        let mut tree = DomTree::new();
        let form = tree.create_element("form");
        let on = tree.create_element("input");
        let off = tree.create_element("input");
        let link = tree.create_element("a");
        tree.append_child(tree.root(), form).unwrap();
        for child in [on, off, link] {
            tree.append_child(form, child).unwrap();
        }
        tree.set_attribute(on, "checked", "").unwrap();
        tree.set_attribute(off, "disabled", "").unwrap();
        tree.set_attribute(link, "href", "/").unwrap();

        assert_eq!(query(&tree, "input:checked"), vec![on]);
        assert_eq!(query(&tree, ":disabled"), vec![off]);
        assert_eq!(query(&tree, "input:enabled"), vec![on]);
        assert_eq!(query(&tree, ":link"), vec![link]);
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in [
            "", "   ", "div >", ",p", "p,", "[x", "[x=]", "a..b", "#", "p!", "li:hover", "p::before",
        ] {
            assert!(
                matches!(SelectorList::parse(bad), Err(DomError::InvalidSelector(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
