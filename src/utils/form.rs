//! `application/x-www-form-urlencoded` bodies with repeated keys preserved.
use std::collections::BTreeMap;

/// Decoded form fields in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    /// Key/value pairs as submitted.
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Decode a urlencoded body.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let pairs = url::form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value submitted for `key`, trimmed. Blank values count as missing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Every value submitted for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Whether a checkbox named `key` was ticked.
    #[must_use]
    pub fn is_checked(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| matches!(value, "on" | "true" | "1" | "yes"))
    }

    /// The last value of every key, for re-rendering a form with the submitted values.
    #[must_use]
    pub fn values(&self) -> BTreeMap<String, String> {
        self.pairs.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
