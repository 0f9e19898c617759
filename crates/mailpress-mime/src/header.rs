//! Extra headers carried by messages and files.

use crate::encoding::encode_rfc2047;
use std::fmt;

/// An ordered header list.
///
/// Lookups ignore ASCII case. Fields keep insertion order, and a name may
/// repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field, keeping any earlier values for the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Replaces every value for `name` with `value`.
    ///
    /// The field stays where the first occurrence was; a new name is
    /// appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(at) => {
                self.fields[at].1 = value;
                let mut index = 0;
                self.fields.retain(|(field, _)| {
                    let keep = index <= at || !field.eq_ignore_ascii_case(&name);
                    index += 1;
                    keep
                });
            }
            None => self.fields.push((name, value)),
        }
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|at| self.fields[at].1.as_str())
    }

    /// Every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Drops every value for `name`.
    pub fn remove(&mut self, name: &str) {
        self.fields
            .retain(|(field, _)| !field.eq_ignore_ascii_case(name));
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(field, _)| field.eq_ignore_ascii_case(name))
    }
}

/// Writes `name` with each dash-separated word capitalized.
fn write_canonical(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for (i, word) in name.split('-').enumerate() {
        if i > 0 {
            f.write_str("-")?;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str().to_ascii_lowercase())?;
        }
    }
    Ok(())
}

/// Renders as `Name: value\r\n` lines. Non-ASCII values become RFC 2047
/// encoded words.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.fields {
            write_canonical(f, name)?;
            write!(f, ": {}\r\n", encode_rfc2047(value, "utf-8"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.add("X-Campaign", "spring");
        assert_eq!(headers.get("x-campaign"), Some("spring"));
        assert_eq!(headers.get("X-CAMPAIGN"), Some("spring"));
        assert_eq!(headers.get("x-other"), None);
    }

    #[test]
    fn test_set_collapses_repeats_in_place() {
        let mut headers = Headers::new();
        headers.add("X-Tag", "a");
        headers.add("Subject", "hi");
        headers.add("x-tag", "b");
        assert_eq!(headers.get_all("X-Tag").collect::<Vec<_>>(), ["a", "b"]);

        headers.set("X-TAG", "c");
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("X-Tag", "c"), ("Subject", "hi")]
        );
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.add("Subject", "Test");
        headers.add("X-Keep", "1");
        headers.remove("SUBJECT");
        assert_eq!(headers.get("Subject"), None);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_display_keeps_order_and_encodes() {
        let mut headers = Headers::new();
        headers.add("x-report-id", "42");
        headers.add("SUBJECT", "Grüße");
        assert_eq!(
            headers.to_string(),
            "X-Report-Id: 42\r\nSubject: =?utf-8?B?R3LDvMOfZQ==?=\r\n"
        );
    }

    #[test]
    fn test_empty() {
        let headers = Headers::default();
        assert!(headers.is_empty());
        assert_eq!(headers.to_string(), "");
    }
}
