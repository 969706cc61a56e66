//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into the domx arena.
//! Fragments use html5ever's fragment algorithm with a context element, as
//! `innerHTML` and `insertAdjacentHTML` do.

use domx_dom::{Document, DomTree, ElementData, NodeId, NodeOperations};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, QualName, ns, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    /// Skip text nodes that contain only whitespace
    pub drop_whitespace: bool,
}

impl HtmlParser {
    /// Create a parser that keeps all text, like a browser DOM
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that skips whitespace-only text
    pub fn dropping_whitespace() -> Self {
        Self {
            drop_whitespace: true,
        }
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL. The document starts out `loading`.
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = self.read(html)?;
        let mut tree = DomTree::new();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, &mut tree)? {
                tree.append_child(NodeId::ROOT, id)?;
            }
        }

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(Document::from_tree(url, tree))
    }

    /// Parse markup as the children of a `<body>`, into detached
    /// top-level nodes owned by `tree`, in order
    pub fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> Result<Vec<NodeId>, ParseError> {
        self.parse_fragment_in(tree, "body", html)
    }

    /// Parse markup as the children of a `context` element (an HTML local
    /// name such as `tbody` or `ul`)
    pub fn parse_fragment_in(
        &self,
        tree: &mut DomTree,
        context: &str,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let context_name = QualName::new(None, ns!(html), LocalName::from(context));
        let dom = parse_fragment(RcDom::default(), Default::default(), context_name, Vec::new(), true)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        // The fragment parser puts everything under a synthetic <html> root
        let document = dom.document.children.borrow();
        let Some(root) = document.first() else {
            return Ok(Vec::new());
        };

        let mut nodes = Vec::new();
        for child in root.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree)? {
                nodes.push(id);
            }
        }
        tracing::trace!(
            "Fragment in <{}> produced {} top-level nodes",
            context,
            nodes.len()
        );
        Ok(nodes)
    }

    fn read(&self, html: &str) -> Result<RcDom, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node (and its subtree) into a detached arena node
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Result<Option<NodeId>, ParseError> {
        let id = match &handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => tree.create_doctype(name, public_id, system_id),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if self.drop_whitespace && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    elem.set_attr(attr.name.local.as_ref(), attr.value.to_string());
                }
                tree.create_element_with(elem)
            }
        };

        for child in handle.children.borrow().iter() {
            if let Some(child_id) = self.convert_node(child, tree)? {
                tree.append_child(id, child_id)?;
            }
        }
        Ok(Some(id))
    }
}
