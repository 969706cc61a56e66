//! Insertable content: markup text or an existing node

use domx_dom::NodeId;

/// Argument of the insertion helpers.
///
/// `insert_after`/`insert_before` serialize a `Node` and insert a copy of
/// its markup; `append`/`prepend` insert the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Markup(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(markup: &'a str) -> Self {
        Content::Markup(markup)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(markup: &'a String) -> Self {
        Content::Markup(markup)
    }
}

impl From<NodeId> for Content<'_> {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}
