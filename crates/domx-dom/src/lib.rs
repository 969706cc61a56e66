//! domx DOM - Document Object Model
//!
//! Arena-backed document tree with the primitives the domx façade delegates
//! to: tree mutation, class tokens, inline style, event listeners, selector
//! queries and the document ready state.

mod classlist;
mod document;
mod error;
mod events;
mod node;
mod query;
mod style;
mod tree;

pub use classlist::ClassList;
pub use document::{Document, ReadyState};
pub use error::{DomError, DomResult};
pub use events::{Event, EventHandler, EventInit, EventPhase, ListenerOptions};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use query::SelectorList;
pub use style::InlineStyle;
pub use tree::{Descendants, DomTree, NodeOperations};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert to `Option`, mapping the sentinel to `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
