//! Dom - façade entry point
//!
//! Owns the document, the parser used for markup arguments, and the
//! configuration. `dispatch` is the `$(...)` of the library.

use std::cell::RefCell;
use std::fmt;

use domx_dom::{Document, DomTree, EventHandler, ListenerOptions, NodeId};
use domx_html::HtmlParser;

use crate::{Config, Dispatched, Element, Elements, Error, Query, Result};

type DomCallback = Box<dyn FnOnce(&mut Dom)>;

/// A document plus the helpers that operate on it
pub struct Dom {
    document: Document,
    parser: HtmlParser,
    config: Config,
    /// `ReadyDom` callbacks waiting for `DOMContentLoaded`, in order
    pending_ready: Vec<DomCallback>,
}

impl Dom {
    /// Empty `html/head/body` document, still loading
    pub fn new(config: Config) -> Self {
        Self {
            document: Document::new(&config.url),
            parser: config.parser(),
            config,
            pending_ready: Vec::new(),
        }
    }

    /// Parse a page. The document stays `loading` until `finish_parsing`.
    pub fn parse(html: &str, config: Config) -> Result<Self> {
        let parser = config.parser();
        let document = parser.parse_with_url(html, &config.url)?;
        Ok(Self {
            document,
            parser,
            config,
            pending_ready: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub(crate) fn tree_mut(&mut self) -> &mut DomTree {
        self.document.tree_mut()
    }

    /// Fire `DOMContentLoaded`, running pending ready callbacks. `Ready`
    /// callbacks run during the event, then `ReadyDom` callbacks in the
    /// order they were registered.
    pub fn finish_parsing(&mut self) {
        self.document.finish_parsing();
        self.run_pending_ready();
    }

    /// Fire `load` (and `DOMContentLoaded` first if still loading)
    pub fn finish_loading(&mut self) {
        self.finish_parsing();
        self.document.finish_loading();
    }

    /// Run queued `ReadyDom` callbacks once the document is ready. Callbacks
    /// may register more; those run in the same pass.
    fn run_pending_ready(&mut self) {
        if !self.document.is_ready() {
            return;
        }
        while !self.pending_ready.is_empty() {
            let batch = std::mem::take(&mut self.pending_ready);
            tracing::debug!("running {} deferred ready callbacks", batch.len());
            for callback in batch {
                callback(self);
            }
        }
    }

    /// Wrap an element node
    pub fn element(&mut self, id: NodeId) -> Result<Element<'_>> {
        self.tree().element(id)?;
        Ok(Element::new(self, id))
    }

    /// Wrap a list of element nodes
    pub fn elements(&mut self, ids: Vec<NodeId>) -> Result<Elements<'_>> {
        for &id in &ids {
            self.tree().element(id)?;
        }
        Ok(Elements::new(self, ids))
    }

    /// The `<body>` element, if the document has one
    pub fn body(&mut self) -> Option<Element<'_>> {
        let body = self.document.body()?;
        Some(Element::new(self, body))
    }

    /// Select, create, or wait for the document, depending on `query`
    pub fn dispatch(&mut self, query: impl Into<Query>) -> Result<Dispatched<'_>> {
        match query.into() {
            Query::Markup(markup) => {
                tracing::debug!("dispatch: creating element from {} bytes of markup", markup.len());
                let created = self.create_html(&markup)?;
                if created.is_none() {
                    tracing::warn!("dispatch: markup {:?} produced no element", markup);
                }
                let element = match created {
                    Some(id) => Some(Element::new(self, id)),
                    None => None,
                };
                Ok(Dispatched::Created(element))
            }
            Query::Selector(selector) => {
                let ids = self.document.query_selector_all(&selector)?;
                tracing::debug!("dispatch: selector {:?} matched {}", selector, ids.len());
                Ok(Dispatched::Selected(Elements::new(self, ids)))
            }
            Query::Ready(callback) => {
                if self.document.is_ready() {
                    tracing::debug!("dispatch: document ready, running callback now");
                    callback();
                } else {
                    tracing::debug!("dispatch: deferring callback to DOMContentLoaded");
                    self.defer_until_ready(callback);
                }
                Ok(Dispatched::Ready)
            }
            Query::ReadyDom(callback) => {
                self.pending_ready.push(callback);
                if self.document.is_ready() {
                    tracing::debug!("dispatch: document ready, running callback now");
                    self.run_pending_ready();
                } else {
                    tracing::debug!("dispatch: queueing callback until DOMContentLoaded");
                }
                Ok(Dispatched::Ready)
            }
        }
    }

    fn defer_until_ready(&mut self, callback: Box<dyn FnOnce()>) {
        let slot = RefCell::new(Some(callback));
        let handler = EventHandler::new(move |_| {
            let callback = slot.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        });
        let once = ListenerOptions {
            capture: false,
            once: true,
        };
        self.document
            .add_event_listener(NodeId::ROOT, "DOMContentLoaded", &handler, once);
    }

    /// Parse markup as the children of a `context` element, into detached
    /// nodes of this document
    pub(crate) fn parse_fragment(&mut self, context: &str, markup: &str) -> Result<Vec<NodeId>> {
        let nodes = self
            .parser
            .parse_fragment_in(self.document.tree_mut(), context, markup)?;
        Ok(nodes)
    }

    /// First element of the markup parsed in a `<body>` context; the other
    /// top-level nodes are dropped
    pub(crate) fn create_html(&mut self, markup: &str) -> Result<Option<NodeId>> {
        let nodes = self.parse_fragment("body", markup)?;
        let tree = self.tree();
        Ok(nodes
            .into_iter()
            .find(|&id| tree.get(id).is_some_and(|n| n.is_element())))
    }

    /// `create_html`, failing when there is no element
    pub(crate) fn create_element(&mut self, markup: &str) -> Result<NodeId> {
        self.create_html(markup)?
            .ok_or_else(|| Error::EmptyMarkup(markup.to_string()))
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("document", &self.document)
            .field("parser", &self.parser)
            .field("config", &self.config)
            .field("pending_ready", &self.pending_ready.len())
            .finish()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_loading() {
        let dom = Dom::default();
        assert!(!dom.document().is_ready());
        assert_eq!(dom.document().url(), "about:blank");
    }

    #[test]
    fn test_create_html_skips_leading_text() {
        let mut dom = Dom::default();
        let id = dom.create_html("hello <em>world</em><b>!</b>").unwrap().unwrap();
        assert_eq!(dom.tree().tag_name(id).as_deref(), Some("EM"));
        assert_eq!(dom.tree().parent(id), None);
    }

    #[test]
    fn test_create_element_without_element_fails() {
        let mut dom = Dom::default();
        assert!(matches!(
            dom.create_element("plain text"),
            Err(Error::EmptyMarkup(_))
        ));
    }

    #[test]
    fn test_ready_dom_callback_can_change_document() {
        let mut dom = Dom::parse("<ul><li>a</li></ul>", Config::default()).unwrap();
        dom.dispatch(Query::ready_dom(|dom| {
            if let Some(mut items) = dom.dispatch("li").ok().and_then(|d| d.elements()) {
                items.add_class("ready");
            }
        }))
        .unwrap();
        assert!(dom.document().query_selector_all(".ready").unwrap().is_empty());

        dom.finish_parsing();
        assert_eq!(dom.document().query_selector_all("li.ready").unwrap().len(), 1);
    }

    #[test]
    fn test_ready_dom_runs_immediately_and_nested() {
        let mut dom = Dom::default();
        dom.finish_loading();
        dom.dispatch(Query::ready_dom(|dom| {
            if let Some(mut body) = dom.body() {
                body.add_class("outer");
            }
            let _ = dom.dispatch(Query::ready_dom(|dom| {
                if let Some(mut body) = dom.body() {
                    body.add_class("inner");
                }
            }));
        }))
        .unwrap();

        let body = dom.document().body().unwrap();
        assert_eq!(dom.tree().attribute(body, "class"), Some("outer inner"));
        assert_eq!(dom.pending_ready.len(), 0);
    }

    #[test]
    fn test_element_rejects_non_elements() {
        let mut dom = Dom::default();
        let text = dom.tree_mut().create_text("x");
        assert!(dom.element(text).is_err());
        assert!(dom.elements(vec![text]).is_err());
        assert!(dom.body().is_some());
    }
}
