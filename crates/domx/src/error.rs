//! Façade errors

use domx_dom::DomError;
use domx_html::ParseError;

/// Result type for façade operations
pub type Result<T> = std::result::Result<T, Error>;

/// Façade error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Markup given where an element was needed produced none
    #[error("markup produced no element: {0:?}")]
    EmptyMarkup(String),
}
