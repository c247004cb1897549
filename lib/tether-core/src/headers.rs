//! Default header table shared by every request of a provider.

use std::sync::{Arc, LazyLock};

static STANDARD: LazyLock<DefaultHeaders> = LazyLock::new(|| {
    DefaultHeaders::new([
        ("Accept", "application/json"),
        ("User-Agent", concat!("tether/", env!("CARGO_PKG_VERSION"))),
    ])
});

/// Immutable header table.
///
/// Cloning is cheap: every clone shares the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultHeaders {
    entries: Arc<[(String, String)]>,
}

impl DefaultHeaders {
    /// Build a table from name/value pairs. Later duplicates win.
    #[must_use]
    pub fn new<N, V>(entries: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut table: Vec<(String, String)> = Vec::new();
        for (name, value) in entries {
            let name = name.into();
            table.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            table.push((name, value.into()));
        }
        Self {
            entries: table.into(),
        }
    }

    /// Table with no headers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Arc::from([]),
        }
    }

    /// Process-wide table sent when nothing else is configured:
    /// `Accept: application/json` and a `User-Agent`.
    #[must_use]
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Header value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DefaultHeaders {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_shared() {
        let a = DefaultHeaders::standard();
        let b = DefaultHeaders::standard();
        assert!(Arc::ptr_eq(&a.entries, &b.entries));
        assert_eq!(a.get("accept"), Some("application/json"));
        assert!(a.get("User-Agent").is_some_and(|ua| ua.starts_with("tether/")));
    }

    #[test]
    fn later_duplicates_win() {
        let headers = DefaultHeaders::new([("Accept", "text/plain"), ("accept", "application/xml")]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("application/xml"));
    }

    #[test]
    fn empty_table() {
        let headers = DefaultHeaders::empty();
        assert!(headers.is_empty());
        assert_eq!(headers.iter().count(), 0);
    }
}
