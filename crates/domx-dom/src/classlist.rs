//! Class token list
//!
//! The `class` attribute viewed as an ordered set of tokens, like
//! `Element.classList`.

/// Ordered, de-duplicated set of class tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value; repeated tokens collapse to one
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for token in value.split_whitespace() {
            list.add(token);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns `false` if it was already present.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token. Returns `false` if it was absent.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dedupes() {
        let list = ClassList::parse("  btn active\tbtn\nlarge ");
        assert_eq!(list.len(), 3);
        assert_eq!(list.value(), "btn active large");
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = ClassList::new();
        assert!(list.add("foo"));
        assert!(!list.add("foo"));
        assert!(!list.add(""));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut list = ClassList::parse("a b c");
        assert!(list.remove("b"));
        assert!(!list.remove("b"));
        assert_eq!(list.to_string(), "a c");
    }
}
