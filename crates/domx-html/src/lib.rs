//! domx HTML
//!
//! HTML5 parsing built on html5ever, converted into the domx arena tree,
//! plus `outerHTML`/`innerHTML` serialization.

mod parser;
mod serializer;

pub use domx_dom::{Document, DomTree, NodeId};
pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, inner_html, outer_html};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build tree: {0}")]
    Dom(#[from] domx_dom::DomError),
}
