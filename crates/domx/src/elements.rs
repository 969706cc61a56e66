//! Element collections
//!
//! Broadcasting versions of the `Element` helpers. The id list is a snapshot
//! taken when the collection was built; later tree changes do not update it.

use domx_dom::{EventHandler, NodeId};

use crate::{Content, Dom, Element, Result};

/// Ordered list of elements sharing one `Dom` borrow
pub struct Elements<'d> {
    dom: &'d mut Dom,
    ids: Vec<NodeId>,
}

impl<'d> Elements<'d> {
    /// Callers guarantee every id is an element of `dom`
    pub(crate) fn new(dom: &'d mut Dom, ids: Vec<NodeId>) -> Self {
        Self { dom, ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Element at `index`
    pub fn get(&mut self, index: usize) -> Option<Element<'_>> {
        let id = *self.ids.get(index)?;
        Some(Element::new(self.dom, id))
    }

    /// Call `f` with each element and its index, in document order
    pub fn each<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element<'_>, usize),
    {
        for (index, &id) in self.ids.iter().enumerate() {
            let mut element = Element::new(self.dom, id);
            f(&mut element, index);
        }
    }

    /// `each` for the infallible helpers, keeping the chain
    fn for_each_element(&mut self, mut f: impl FnMut(&mut Element<'_>)) -> &mut Self {
        self.each(|el, _| f(el));
        self
    }

    /// Run a fallible operation on every element, stopping at the first error.
    /// Elements before the failing one keep their changes.
    fn broadcast<F>(&mut self, op: &str, mut f: F) -> Result<&mut Self>
    where
        F: FnMut(&mut Element<'_>) -> Result<()>,
    {
        for (index, &id) in self.ids.iter().enumerate() {
            let mut element = Element::new(self.dom, id);
            if let Err(err) = f(&mut element) {
                tracing::trace!("{}: aborted at element {} of {}: {}", op, index, self.ids.len(), err);
                return Err(err);
            }
        }
        tracing::trace!("{}: applied to {} elements", op, self.ids.len());
        Ok(self)
    }

    pub fn add_class(&mut self, name: &str) -> &mut Self {
        self.for_each_element(|el| {
            el.add_class(name);
        })
    }

    pub fn remove_class(&mut self, name: &str) -> &mut Self {
        self.for_each_element(|el| {
            el.remove_class(name);
        })
    }

    /// Toggle per element; each element flips independently
    pub fn toggle_class(&mut self, name: &str) -> &mut Self {
        self.for_each_element(|el| {
            el.toggle_class(name);
        })
    }

    pub fn show(&mut self) -> &mut Self {
        self.for_each_element(|el| {
            el.show();
        })
    }

    pub fn hide(&mut self) -> &mut Self {
        self.for_each_element(|el| {
            el.hide();
        })
    }

    /// Register the same handler on every element
    pub fn on(&mut self, event: &str, handler: &EventHandler) -> &mut Self {
        self.for_each_element(|el| {
            el.on(event, handler);
        })
    }

    pub fn off(&mut self, event: &str, handler: &EventHandler) -> &mut Self {
        self.for_each_element(|el| {
            el.off(event, handler);
        })
    }

    /// Insert a fresh copy of the markup after each element
    pub fn insert_after<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let content = content.into();
        self.broadcast("insert_after", |el| el.insert_after(content).map(drop))
    }

    /// Insert a fresh copy of the markup before each element
    pub fn insert_before<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let content = content.into();
        self.broadcast("insert_before", |el| el.insert_before(content).map(drop))
    }

    /// Markup builds one element per target. A node argument is moved, so it
    /// ends up under the last element.
    pub fn prepend<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let content = content.into();
        self.broadcast("prepend", |el| el.prepend(content).map(drop))
    }

    /// Markup builds one element per target. A node argument is moved, so it
    /// ends up under the last element.
    pub fn append<'c>(&mut self, content: impl Into<Content<'c>>) -> Result<&mut Self> {
        let content = content.into();
        self.broadcast("append", |el| el.append(content).map(drop))
    }

    /// Detach every element. Fails on the first one without a parent.
    pub fn remove(&mut self) -> Result<()> {
        self.broadcast("remove", |el| el.remove().map(drop))?;
        Ok(())
    }
}

impl std::fmt::Debug for Elements<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Elements").field("ids", &self.ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Error};
    use domx_dom::DomError;

    fn select<'d>(dom: &'d mut Dom, selector: &str) -> Elements<'d> {
        dom.dispatch(selector).unwrap().elements().unwrap()
    }

    #[test]
    fn test_broadcast_class_and_each() {
        let mut dom = Dom::parse("<p>a</p><p class=\"x\">b</p>", Config::default()).unwrap();
        let mut seen = Vec::new();
        let () = select(&mut dom, "p").toggle_class("x").each(|el, i| {
            seen.push((i, el.class_name().to_string()));
        });
        assert_eq!(seen, vec![(0, "x".to_string()), (1, String::new())]);
    }

    #[test]
    fn test_append_markup_creates_one_per_target() {
        let mut dom = Dom::parse("<div></div><div></div>", Config::default()).unwrap();
        select(&mut dom, "div").append("<span>s</span>").unwrap();
        assert_eq!(select(&mut dom, "div > span").len(), 2);
    }

    #[test]
    fn test_get_and_empty() {
        let mut dom = Dom::parse("<p>a</p>", Config::default()).unwrap();
        let mut none = select(&mut dom, "section");
        assert!(none.is_empty());
        assert!(none.get(0).is_none());

        let mut ps = select(&mut dom, "p");
        assert_eq!(ps.get(0).unwrap().text_content(), "a");
    }

    #[test]
    fn test_remove_stops_at_first_error() {
        let mut dom = Dom::parse("<p>a</p><p>b</p>", Config::default()).unwrap();
        let ids = select(&mut dom, "p").ids().to_vec();
        dom.element(ids[1]).unwrap().remove().unwrap();

        let err = dom.elements(vec![ids[1], ids[0]]).unwrap().remove().unwrap_err();
        assert!(matches!(err, Error::Dom(DomError::NoParent(_))));
        // The first element failed, so the second was never touched
        assert!(dom.tree().parent(ids[0]).is_some());
    }
}
