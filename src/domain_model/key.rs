use serde::Deserialize;
use std::fmt;

/// Namespace prepended to every session identifier before it reaches the backend.
///
/// The prefix is concatenated as-is, so it should carry its own separator
/// (`"session:token:"`). Stores built with different prefixes over one backend
/// never see each other's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        KeyPrefix(prefix.into())
    }

    pub fn key(&self, id: &str) -> String {
        let mut key = String::with_capacity(self.0.len() + id.len());
        key.push_str(&self.0);
        key.push_str(id);
        key
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for KeyPrefix {
    fn from(s: &str) -> Self {
        KeyPrefix::new(s)
    }
}

impl From<String> for KeyPrefix {
    fn from(s: String) -> Self {
        KeyPrefix(s)
    }
}
