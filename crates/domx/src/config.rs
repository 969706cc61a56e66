//! Façade configuration

use domx_html::HtmlParser;
use serde::{Deserialize, Serialize};

/// Configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document URL
    pub url: String,

    /// Inline `display` value written by `hide()`
    pub hidden_display: String,

    /// Skip whitespace-only text nodes when parsing markup
    pub drop_whitespace: bool,
}

impl Config {
    pub(crate) fn parser(&self) -> HtmlParser {
        HtmlParser {
            drop_whitespace: self.drop_whitespace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            hidden_display: "none".to_string(),
            drop_whitespace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "url": "https://example.com/" }"#).unwrap();
        assert_eq!(config.url, "https://example.com/");
        assert_eq!(config.hidden_display, "none");
        assert!(!config.drop_whitespace);
    }

    #[test]
    fn test_parser_follows_config() {
        let config = Config {
            drop_whitespace: true,
            ..Config::default()
        };
        assert!(config.parser().drop_whitespace);
    }
}
