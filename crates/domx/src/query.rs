//! Dispatcher input and output

use std::fmt;

use crate::{Dom, Element, Elements};

/// What the dispatcher was asked to do.
///
/// Strings are classified once, on conversion: a leading `<` means markup,
/// anything else is a selector. Markup with leading whitespace is
/// therefore a selector.
pub enum Query {
    /// CSS selector evaluated against the document
    Selector(String),
    /// HTML to build an element from
    Markup(String),
    /// Callback to run once the document is ready.
    ///
    /// It is `'static` and runs while the document is dispatching
    /// `DOMContentLoaded`, so it cannot reach the `Dom`. Use `ReadyDom` to
    /// query or change the document once it is ready.
    Ready(Box<dyn FnOnce()>),
    /// Callback given the `Dom` once the document is ready
    ReadyDom(Box<dyn FnOnce(&mut Dom)>),
}

impl Query {
    /// Classify a string by its first character
    pub fn classify(input: &str) -> Self {
        if input.starts_with('<') {
            Query::Markup(input.to_string())
        } else {
            Query::Selector(input.to_string())
        }
    }

    /// Ready callback
    pub fn ready(callback: impl FnOnce() + 'static) -> Self {
        Query::Ready(Box::new(callback))
    }

    /// Ready callback that receives the `Dom`
    pub fn ready_dom(callback: impl FnOnce(&mut Dom) + 'static) -> Self {
        Query::ReadyDom(Box::new(callback))
    }
}

impl From<&str> for Query {
    fn from(input: &str) -> Self {
        Query::classify(input)
    }
}

impl From<String> for Query {
    fn from(input: String) -> Self {
        Query::classify(&input)
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
            Query::Markup(s) => f.debug_tuple("Markup").field(s).finish(),
            Query::Ready(_) => f.write_str("Ready(..)"),
            Query::ReadyDom(_) => f.write_str("ReadyDom(..)"),
        }
    }
}

/// Dispatcher result, one variant per `Query` branch
#[derive(Debug)]
pub enum Dispatched<'d> {
    /// First element built from markup, if the markup had one
    Created(Option<Element<'d>>),
    /// Static snapshot of matching elements
    Selected(Elements<'d>),
    /// Callback ran or was scheduled (either ready variant); nothing to return
    Ready,
}

impl<'d> Dispatched<'d> {
    /// The created element, if this came from markup that produced one
    pub fn element(self) -> Option<Element<'d>> {
        match self {
            Dispatched::Created(element) => element,
            _ => None,
        }
    }

    /// The selected collection, if this came from a selector
    pub fn elements(self) -> Option<Elements<'d>> {
        match self {
            Dispatched::Selected(elements) => Some(elements),
            _ => None,
        }
    }
}
