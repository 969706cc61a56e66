//! domx
//!
//! A small convenience layer over the document tree: class toggling,
//! show/hide, event binding, HTML insertion and removal, and a single
//! dispatcher that selects, creates or waits for the document depending on
//! its argument.
//!
//! # Example
//! ```rust,ignore
//! use domx::{Config, Dom, Query};
//!
//! let mut dom = Dom::parse("<ul><li>one</li></ul>", Config::default())?;
//! dom.dispatch("li")?
//!     .elements()
//!     .unwrap()
//!     .add_class("item")
//!     .append("<b>!</b>")?;
//! dom.dispatch(Query::ready(|| println!("ready")))?;
//! dom.finish_parsing();
//! ```

mod config;
mod content;
mod dom;
mod element;
mod elements;
mod error;
mod query;

pub use config::Config;
pub use content::Content;
pub use dom::Dom;
pub use element::Element;
pub use elements::Elements;
pub use error::{Error, Result};
pub use query::{Dispatched, Query};

pub use domx_dom::{Event, EventHandler, NodeId, ReadyState};

// Re-export the underlying crates
pub use domx_dom as dom_tree;
pub use domx_html as html;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
