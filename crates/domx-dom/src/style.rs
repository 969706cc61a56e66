//! Inline style declarations
//!
//! Minimal view of the `style` attribute: an ordered list of
//! `name: value` pairs. No CSS value validation happens here.

/// Parsed inline `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a: b; c: d`. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for decl in text.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            style.set(name, value);
        }
        style
    }

    /// Property value, if set
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove(&name);
            return;
        }
        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.declarations.push((name, value.to_string())),
        }
    }

    /// Remove a property, returning the old value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.trim().to_ascii_lowercase();
        let pos = self.declarations.iter().position(|(n, _)| *n == name)?;
        Some(self.declarations.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialized attribute value
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = InlineStyle::parse("COLOR: red ;display:block;;bogus");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("display"), Some("block"));
        assert_eq!(style.to_css(), "color: red; display: block;");
    }

    #[test]
    fn test_set_empty_removes() {
        let mut style = InlineStyle::parse("display: none");
        style.set("display", "");
        assert!(style.is_empty());
        assert_eq!(style.to_css(), "");
    }

    #[test]
    fn test_set_keeps_order() {
        let mut style = InlineStyle::parse("a: 1; b: 2");
        style.set("a", "3");
        assert_eq!(style.to_css(), "a: 3; b: 2;");
    }
}
