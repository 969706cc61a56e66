//! DOM Events
//!
//! Event objects, handlers and the per-node listener registry. Dispatch
//! itself lives on `Document` because it needs the tree to build the
//! propagation path.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Construction flags (`EventInit`)
#[derive(Debug, Clone, Copy, Default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

/// A dispatched event. Flags use interior mutability so handlers get `&Event`.
#[derive(Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    target: Cell<NodeId>,
    current_target: Cell<NodeId>,
    phase: Cell<EventPhase>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Non-bubbling, non-cancelable event
    pub fn new(event_type: &str) -> Self {
        Self::with_init(event_type, EventInit::default())
    }

    /// Bubbling event
    pub fn bubbling(event_type: &str) -> Self {
        Self::with_init(
            event_type,
            EventInit {
                bubbles: true,
                cancelable: false,
            },
        )
    }

    pub fn with_init(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            target: Cell::new(NodeId::NONE),
            current_target: Cell::new(NodeId::NONE),
            phase: Cell::new(EventPhase::None),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn target(&self) -> NodeId {
        self.target.get()
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    /// Stop propagation after the current node
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Prevent default action (only for cancelable events)
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub(crate) fn begin(&self, target: NodeId) {
        self.target.set(target);
        self.propagation_stopped.set(false);
    }

    pub(crate) fn enter(&self, node: NodeId, phase: EventPhase) {
        self.current_target.set(node);
        self.phase.set(phase);
    }

    pub(crate) fn finish(&self) {
        self.current_target.set(NodeId::NONE);
        self.phase.set(EventPhase::None);
    }
}

/// Event callback. Identity is the shared allocation: clone the handler
/// to unregister it later.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
}

#[derive(Debug, Clone)]
struct Listener {
    event_type: String,
    handler: EventHandler,
    capture: bool,
    once: bool,
}

/// Listeners by target node, in registration order
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    listeners: HashMap<NodeId, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Register; a duplicate (type, handler, capture) is ignored
    pub fn add(
        &mut self,
        target: NodeId,
        event_type: &str,
        handler: &EventHandler,
        options: ListenerOptions,
    ) -> bool {
        let list = self.listeners.entry(target).or_default();
        let duplicate = list.iter().any(|l| {
            l.event_type == event_type && l.handler == *handler && l.capture == options.capture
        });
        if duplicate {
            return false;
        }
        list.push(Listener {
            event_type: event_type.to_string(),
            handler: handler.clone(),
            capture: options.capture,
            once: options.once,
        });
        true
    }

    pub fn remove(
        &mut self,
        target: NodeId,
        event_type: &str,
        handler: &EventHandler,
        capture: bool,
    ) -> bool {
        let Some(list) = self.listeners.get_mut(&target) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| {
            !(l.event_type == event_type && l.handler == *handler && l.capture == capture)
        });
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&target);
        }
        removed
    }

    /// Handlers to run for `event_type` on `target` in the given phase.
    /// `once` listeners are unregistered as they are taken.
    pub fn take_handlers(
        &mut self,
        target: NodeId,
        event_type: &str,
        phase: EventPhase,
    ) -> Vec<EventHandler> {
        let Some(list) = self.listeners.get_mut(&target) else {
            return Vec::new();
        };
        let wanted = |l: &Listener| {
            l.event_type == event_type
                && match phase {
                    EventPhase::Capturing => l.capture,
                    EventPhase::Bubbling => !l.capture,
                    EventPhase::AtTarget => true,
                    EventPhase::None => false,
                }
        };
        let handlers = list
            .iter()
            .filter(|l| wanted(*l))
            .map(|l| l.handler.clone())
            .collect();
        list.retain(|l| !(l.once && wanted(l)));
        handlers
    }

    pub fn count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&target)
            .map_or(0, |list| list.iter().filter(|l| l.event_type == event_type).count())
    }
}
