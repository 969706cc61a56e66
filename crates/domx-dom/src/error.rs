//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not exist in the arena
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    /// Inserting a node where it cannot go (into itself, an ancestor, or a leaf)
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Node is not a child of the given parent
    #[error("node {0:?} is not a child of the given parent")]
    NotAChild(NodeId),

    /// Node has no parent to be removed from
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),

    /// Adjacent insertion needs an element parent
    #[error("cannot insert next to node {0:?}: parent is not an element")]
    NoModificationAllowed(NodeId),

    /// Operation requires an element node
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// Selector failed to parse
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),
}
