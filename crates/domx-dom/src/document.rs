//! Document - High-level document API
//!
//! Owns the tree, the listener registry and the ready state.

use crate::events::ListenerRegistry;
use crate::{
    DomResult, DomTree, Event, EventHandler, EventPhase, ListenerOptions, NodeId,
    NodeOperations, SelectorList,
};

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    ready_state: ReadyState,
    listeners: ListenerRegistry,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `html/head/body` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached elements always accept these links.
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self::from_tree(url, tree)
    }

    /// Wrap an already-built tree, locating `html`, `head` and `body`
    pub fn from_tree(url: &str, tree: DomTree) -> Self {
        let mut document = Self {
            tree,
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            listeners: ListenerRegistry::default(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        document.locate_structure();
        document
    }

    fn locate_structure(&mut self) {
        let named = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .find(|&id| tree.get(id).and_then(|n| n.as_element()).is_some_and(|e| e.name == tag))
                .unwrap_or(NodeId::NONE)
        };
        self.html_element = named(&self.tree, NodeId::ROOT, "html");
        if self.html_element.is_valid() {
            self.head_element = named(&self.tree, self.html_element, "head");
            self.body_element = named(&self.tree, self.html_element, "body");
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.tag_name(id).as_deref() == Some("TITLE"))
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get a connected element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&node| self.tree.attribute(node, "id") == Some(id))
    }

    /// `document.querySelectorAll`: static snapshot in document order
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(list.query_all(&self.tree, NodeId::ROOT))
    }

    /// `document.querySelector`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(list.query_first(&self.tree, NodeId::ROOT))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// `addEventListener`. Returns `false` for a duplicate registration.
    pub fn add_event_listener(
        &mut self,
        target: NodeId,
        event_type: &str,
        handler: &EventHandler,
        options: ListenerOptions,
    ) -> bool {
        self.listeners.add(target, event_type, handler, options)
    }

    /// `removeEventListener`. Returns `false` if nothing matched.
    pub fn remove_event_listener(
        &mut self,
        target: NodeId,
        event_type: &str,
        handler: &EventHandler,
        capture: bool,
    ) -> bool {
        self.listeners.remove(target, event_type, handler, capture)
    }

    /// Number of listeners for `event_type` on `target`
    pub fn listener_count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners.count(target, event_type)
    }

    /// Dispatch through capture, target and bubble phases.
    /// Returns `false` if a handler prevented the default.
    pub fn dispatch_event(&mut self, target: NodeId, event: &Event) -> bool {
        let path: Vec<NodeId> = self.tree.ancestors(target).collect();
        tracing::trace!(
            "dispatch {} at {:?} (path len {})",
            event.event_type(),
            target,
            path.len()
        );
        event.begin(target);

        let mut stopped = false;
        for &node in path.iter().rev() {
            stopped = self.invoke(node, event, EventPhase::Capturing);
            if stopped {
                break;
            }
        }
        if !stopped {
            stopped = self.invoke(target, event, EventPhase::AtTarget);
        }
        if !stopped && event.bubbles() {
            for &node in &path {
                if self.invoke(node, event, EventPhase::Bubbling) {
                    break;
                }
            }
        }

        event.finish();
        !event.default_prevented()
    }

    /// Run one node's handlers; returns whether propagation was stopped
    fn invoke(&mut self, node: NodeId, event: &Event, phase: EventPhase) -> bool {
        let handlers = self.listeners.take_handlers(node, event.event_type(), phase);
        event.enter(node, phase);
        for handler in handlers {
            handler.call(event);
        }
        event.is_propagation_stopped()
    }

    // ------------------------------------------------------------------
    // Ready state
    // ------------------------------------------------------------------

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Parsing has finished (`readyState != "loading"`)
    pub fn is_ready(&self) -> bool {
        self.ready_state != ReadyState::Loading
    }

    /// Move to `interactive` and fire `DOMContentLoaded`. No-op once past loading.
    pub fn finish_parsing(&mut self) {
        if self.ready_state != ReadyState::Loading {
            return;
        }
        self.set_ready_state(ReadyState::Interactive);
        self.dispatch_event(NodeId::ROOT, &Event::bubbling("DOMContentLoaded"));
    }

    /// Move to `complete` and fire `load`, finishing parsing first if needed
    pub fn finish_loading(&mut self) {
        self.finish_parsing();
        if self.ready_state == ReadyState::Complete {
            return;
        }
        self.set_ready_state(ReadyState::Complete);
        self.dispatch_event(NodeId::ROOT, &Event::new("load"));
    }

    fn set_ready_state(&mut self, state: ReadyState) {
        tracing::debug!("{}: readyState -> {}", self.url, state.as_str());
        self.ready_state = state;
        self.dispatch_event(NodeId::ROOT, &Event::new("readystatechange"));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> EventHandler {
        let log = Rc::clone(log);
        let label = label.to_string();
        EventHandler::new(move |e| log.borrow_mut().push(format!("{label}:{:?}", e.phase())))
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.url(), "https://example.com/");
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_capture_target_bubble_order() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let button = doc.tree_mut().create_element("button");
        doc.tree_mut().append_child(body, button).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let capture = ListenerOptions {
            capture: true,
            once: false,
        };
        doc.add_event_listener(NodeId::ROOT, "click", &recorder(&log, "doc"), capture);
        doc.add_event_listener(body, "click", &recorder(&log, "body"), ListenerOptions::default());
        doc.add_event_listener(button, "click", &recorder(&log, "button"), ListenerOptions::default());

        doc.dispatch_event(button, &Event::bubbling("click"));
        assert_eq!(
            *log.borrow(),
            vec!["doc:Capturing", "button:AtTarget", "body:Bubbling"]
        );

        log.borrow_mut().clear();
        doc.dispatch_event(button, &Event::new("click"));
        assert_eq!(*log.borrow(), vec!["doc:Capturing", "button:AtTarget"]);
    }

    #[test]
    fn test_stop_propagation() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let hits = Rc::new(RefCell::new(0));

        let stopper = EventHandler::new(|e| e.stop_propagation());
        let counter = {
            let hits = Rc::clone(&hits);
            EventHandler::new(move |_| *hits.borrow_mut() += 1)
        };
        doc.add_event_listener(body, "click", &stopper, ListenerOptions::default());
        doc.add_event_listener(NodeId::ROOT, "click", &counter, ListenerOptions::default());

        doc.dispatch_event(body, &Event::bubbling("click"));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_ready_transitions_fire_once() {
        let mut doc = Document::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        for ty in ["readystatechange", "DOMContentLoaded", "load"] {
            let log = Rc::clone(&log);
            let handler = EventHandler::new(move |e| log.borrow_mut().push(e.event_type().to_string()));
            doc.add_event_listener(NodeId::ROOT, ty, &handler, ListenerOptions::default());
        }

        assert!(!doc.is_ready());
        doc.finish_parsing();
        doc.finish_parsing();
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
        doc.finish_loading();
        doc.finish_loading();
        assert_eq!(doc.ready_state(), ReadyState::Complete);

        assert_eq!(
            *log.borrow(),
            vec!["readystatechange", "DOMContentLoaded", "readystatechange", "load"]
        );
    }

    #[test]
    fn test_query_selector_all_is_a_snapshot() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let p = doc.tree_mut().create_element("p");
        doc.tree_mut().append_child(body, p).unwrap();

        let found = doc.query_selector_all("p").unwrap();
        let late = doc.tree_mut().create_element("p");
        doc.tree_mut().append_child(body, late).unwrap();

        assert_eq!(found, vec![p]);
        assert_eq!(doc.query_selector("body > p").unwrap(), Some(p));
        assert!(doc.query_selector_all("p:").is_err());
    }

    #[test]
    fn test_title_and_lookup_by_id() {
        let mut doc = Document::default();
        let head = doc.head().unwrap();
        let title = doc.tree_mut().create_element("title");
        let text = doc.tree_mut().create_text(" Hello ");
        doc.tree_mut().append_child(head, title).unwrap();
        doc.tree_mut().append_child(title, text).unwrap();
        doc.tree_mut().set_attribute(title, "id", "t").unwrap();

        assert_eq!(doc.title(), "Hello");
        assert_eq!(doc.get_element_by_id("t"), Some(title));
        assert_eq!(doc.get_element_by_id("nope"), None);
    }
}
