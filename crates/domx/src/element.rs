//! Single-element helpers
//!
//! `Element` borrows the `Dom` for as long as it is used, so calls chain:
//!
//! ```rust,ignore
//! dom.element(id)?.add_class("open").show().on("click", &handler);
//! ```

use std::fmt;

use domx_dom::{DomError, EventHandler, ListenerOptions, NodeId, NodeOperations};
use domx_html::{inner_html, outer_html};

use crate::{Content, Dom, Result};

/// One element of the document
pub struct Element<'d> {
    dom: &'d mut Dom,
    id: NodeId,
}

impl<'d> Element<'d> {
    /// Callers guarantee `id` is an element of `dom`
    pub(crate) fn new(dom: &'d mut Dom, id: NodeId) -> Self {
        Self { dom, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// Add each whitespace-separated class in `name`
    pub fn add_class(&mut self, name: &str) -> &mut Self {
        // Tree class helpers only fail for non-elements
        let _ = self.dom.tree_mut().add_class(self.id, name);
        self
    }

    /// Remove each whitespace-separated class in `name`
    pub fn remove_class(&mut self, name: &str) -> &mut Self {
        let _ = self.dom.tree_mut().remove_class(self.id, name);
        self
    }

    /// Whether `name` is one of the element's classes
    pub fn has_class(&self, name: &str) -> bool {
        self.dom.tree().has_class(self.id, name)
    }

    pub fn toggle_class(&mut self, name: &str) -> &mut Self {
        let _ = self.dom.tree_mut().toggle_class(self.id, name);
        self
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    /// Clear the inline `display` override. An earlier non-default value
    /// is not restored.
    pub fn show(&mut self) -> &mut Self {
        self.set_display("")
    }

    /// Set the inline `display` to the configured hidden value
    pub fn hide(&mut self) -> &mut Self {
        let hidden = self.dom.config().hidden_display.clone();
        self.set_display(&hidden)
    }

    fn set_display(&mut self, value: &str) -> &mut Self {
        // `set_style_property` only fails for non-elements
        let _ = self.dom.tree_mut().set_style_property(self.id, "display", value);
        self
    }

    /// Inline `display` value, empty when unset
    pub fn display(&self) -> String {
        self.dom.tree().style_property(self.id, "display")
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a bubbling-phase listener
    pub fn on(&mut self, event: &str, handler: &EventHandler) -> &mut Self {
        self.dom
            .document_mut()
            .add_event_listener(self.id, event, handler, ListenerOptions::default());
        self
    }

    /// Unregister a listener added with `on`
    pub fn off(&mut self, event: &str, handler: &EventHandler) -> &mut Self {
        self.dom
            .document_mut()
            .remove_event_listener(self.id, event, handler, false);
        self
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Insert markup after this element. A node argument is copied through
    /// its `outerHTML`; the original stays where it is.
    pub fn insert_after<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let markup = self.markup_of(content.into());
        let (_, context) = self.adjacent_parent()?;
        let nodes = self.dom.parse_fragment(&context, &markup)?;

        let mut anchor = self.id;
        for node in nodes {
            self.dom.tree_mut().insert_after(anchor, node)?;
            anchor = node;
        }
        Ok(self)
    }

    /// Insert markup before this element. A node argument is copied through
    /// its `outerHTML`; the original stays where it is.
    pub fn insert_before<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let markup = self.markup_of(content.into());
        let (parent, context) = self.adjacent_parent()?;
        let nodes = self.dom.parse_fragment(&context, &markup)?;

        let tree = self.dom.tree_mut();
        for node in nodes {
            tree.insert_before(parent, node, Some(self.id))?;
        }
        Ok(self)
    }

    /// Insert as first child. Markup builds a new element; a node argument
    /// is moved here as-is.
    pub fn prepend<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let child = self.child_of(content.into())?;
        self.dom.tree_mut().prepend_child(self.id, child)?;
        Ok(self)
    }

    /// Insert as last child. Markup builds a new element; a node argument
    /// is moved here as-is.
    pub fn append<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let child = self.child_of(content.into())?;
        self.dom.tree_mut().append_child(self.id, child)?;
        Ok(self)
    }

    /// Detach from the parent. Fails if there is none.
    pub fn remove(&mut self) -> Result<&mut Self> {
        let tree = self.dom.tree_mut();
        let parent = tree.parent(self.id).ok_or(DomError::NoParent(self.id))?;
        tree.remove_child(parent, self.id)?;
        Ok(self)
    }

    fn markup_of(&self, content: Content<'_>) -> String {
        match content {
            Content::Markup(markup) => markup.to_string(),
            Content::Node(node) => outer_html(self.dom.tree(), node),
        }
    }

    fn child_of(&mut self, content: Content<'_>) -> Result<NodeId> {
        match content {
            Content::Markup(markup) => self.dom.create_element(markup),
            Content::Node(node) => Ok(node),
        }
    }

    /// Adjacent insertion needs an element parent, which is also the
    /// parsing context for the inserted markup
    fn adjacent_parent(&self) -> Result<(NodeId, String)> {
        let tree = self.dom.tree();
        let parent = tree.parent(self.id);
        match parent.and_then(|p| Some((p, tree.element(p).ok()?))) {
            Some((id, elem)) => Ok((id, elem.name.clone())),
            None => Err(DomError::NoModificationAllowed(self.id).into()),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Upper-case tag name
    pub fn tag_name(&self) -> String {
        self.dom.tree().tag_name(self.id).unwrap_or_default()
    }

    pub fn text_content(&self) -> String {
        self.dom.tree().text_content(self.id)
    }

    pub fn outer_html(&self) -> String {
        outer_html(self.dom.tree(), self.id)
    }

    pub fn inner_html(&self) -> String {
        inner_html(self.dom.tree(), self.id)
    }

    /// Raw `class` attribute
    pub fn class_name(&self) -> &str {
        self.attribute("class").unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.dom.tree().attribute(self.id, name)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.dom.tree().parent(self.id)
    }

    /// Element children, in order
    pub fn children(&self) -> Vec<NodeId> {
        self.dom.tree().element_children(self.id).collect()
    }

    pub fn child_count(&self) -> usize {
        self.dom.tree().element_children(self.id).count()
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag_name())
            .finish()
    }
}
