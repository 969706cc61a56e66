//! DOM Tree (arena-based allocation)
//!
//! Core node manipulation: appendChild, insertBefore, removeChild, plus the
//! attribute-level helpers (class tokens, inline style) the façade uses.

use crate::{
    ClassList, DomError, DomResult, ElementData, InlineStyle, Node, NodeData, NodeId,
};

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node, moving it out of its current parent
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert before a reference node (`None` appends)
    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Iterate over direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::successors(first.to_option(), move |&cur| {
            self.get(cur).and_then(|n| n.next_sibling.to_option())
        })
        .filter_map(move |cur| self.get(cur).map(|n| (cur, n)))
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, n)| n.is_element())
            .map(|(cur, _)| cur)
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&cur| self.parent(cur))
    }

    /// Previous sibling that is an element
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while cur.is_valid() {
            let node = self.get(cur)?;
            if node.is_element() {
                return Some(cur);
            }
            cur = node.prev_sibling;
        }
        None
    }

    /// Pre-order walk of all descendants (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            scope: id,
            next: first,
        }
    }

    /// `a` is `b` or one of `b`'s ancestors
    pub fn is_inclusive_ancestor(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.ancestors(b).any(|cur| cur == a)
    }

    /// Attached to the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Unlink a node from its parent and siblings. No-op when detached.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }

        let node = self.node_mut(id)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Insert `new_child` right after `reference` under the same parent
    pub fn insert_after(&mut self, reference: NodeId, new_child: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(reference).ok_or(DomError::NoParent(reference))?;
        let next = self.node(reference)?.next_sibling;
        self.insert_before(parent, new_child, next.to_option())
    }

    /// Insert as first child
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let first = self.node(parent)?.first_child;
        self.insert_before(parent, child, first.to_option())
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Upper-case tag name for elements (`Element.tagName`)
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.get(id)?
            .as_element()
            .map(|e| e.name.to_ascii_uppercase())
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => t.clone(),
            Some(NodeData::Element(_)) | Some(NodeData::Document) => self
                .descendants(id)
                .filter_map(|cur| self.get(cur).and_then(Node::as_text))
                .collect(),
            _ => String::new(),
        }
    }

    /// Element data, or `NotAnElement`
    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    /// Mutable element data, or `NotAnElement`
    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Class tokens
    // ------------------------------------------------------------------

    /// Current class tokens (empty for non-elements)
    pub fn class_list(&self, id: NodeId) -> ClassList {
        ClassList::parse(self.attribute(id, "class").unwrap_or_default())
    }

    /// Whether `token` is one of the element's classes. A token containing
    /// whitespace is never present.
    pub fn has_class(&self, id: NodeId, token: &str) -> bool {
        self.class_list(id).contains(token)
    }

    /// Add each whitespace-separated class in `names`
    pub fn add_class(&mut self, id: NodeId, names: &str) -> DomResult<()> {
        self.update_classes(id, |list| {
            for token in names.split_whitespace() {
                list.add(token);
            }
        })
    }

    /// Remove each whitespace-separated class in `names`
    pub fn remove_class(&mut self, id: NodeId, names: &str) -> DomResult<()> {
        self.update_classes(id, |list| {
            for token in names.split_whitespace() {
                list.remove(token);
            }
        })
    }

    /// Remove `names` if present as a class, add it otherwise
    pub fn toggle_class(&mut self, id: NodeId, names: &str) -> DomResult<()> {
        if self.has_class(id, names) {
            self.remove_class(id, names)
        } else {
            self.add_class(id, names)
        }
    }

    /// Edit the token list and write it back. An element without a `class`
    /// attribute only gains one if the result is non-empty.
    fn update_classes(&mut self, id: NodeId, edit: impl FnOnce(&mut ClassList)) -> DomResult<()> {
        let elem = self.element_mut(id)?;
        let existing = elem.get_attr("class");
        let had_attr = existing.is_some();
        let mut list = ClassList::parse(existing.unwrap_or_default());
        edit(&mut list);
        if had_attr || !list.is_empty() {
            elem.set_attr("class", list.value());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inline style
    // ------------------------------------------------------------------

    pub fn inline_style(&self, id: NodeId) -> InlineStyle {
        InlineStyle::parse(self.attribute(id, "style").unwrap_or_default())
    }

    /// `element.style.getPropertyValue(name)`; empty when unset
    pub fn style_property(&self, id: NodeId, name: &str) -> String {
        self.inline_style(id)
            .get(name)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// `element.style[name] = value`; empty value clears the property
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let had_attr = self.element(id)?.get_attr("style").is_some();
        let mut style = self.inline_style(id);
        style.set(name, value);
        if had_attr || !style.is_empty() {
            self.set_attribute(id, "style", &style.to_css())?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if !self.node(parent)?.can_have_children() {
            return Err(DomError::HierarchyRequest);
        }
        let child_node = self.node(new_child)?;
        if matches!(child_node.data, NodeData::Document)
            || self.is_inclusive_ancestor(new_child, parent)
        {
            return Err(DomError::HierarchyRequest);
        }

        let mut reference = ref_child;
        if let Some(r) = reference {
            if self.node(r)?.parent != parent {
                return Err(DomError::NotAChild(r));
            }
            if r == new_child {
                reference = self.node(new_child)?.next_sibling.to_option();
            }
        }

        self.detach(new_child)?;

        let prev = match reference {
            Some(r) => {
                let prev = self.node(r)?.prev_sibling;
                self.node_mut(r)?.prev_sibling = new_child;
                prev
            }
            None => {
                let last = self.node(parent)?.last_child;
                self.node_mut(parent)?.last_child = new_child;
                last
            }
        };
        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = new_child;
        } else {
            self.node_mut(parent)?.first_child = new_child;
        }

        let node = self.node_mut(new_child)?;
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = reference.unwrap_or(NodeId::NONE);
        Ok(new_child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild(child));
        }
        self.detach(child)?;
        Ok(child)
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    scope: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cur = current;
            loop {
                if cur == self.scope {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cur) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cur = n.parent;
                if !cur.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}
