//! Session identifiers and default-session resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The well-known session identifier used when a caller does not supply one.
///
/// This is the only session guaranteed to exist in a freshly initialized
/// cache.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Partition key under which a sequence of tool descriptors is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve an optional caller-supplied identifier.
    ///
    /// `None` and the empty string both map to [`DEFAULT_SESSION_ID`];
    /// anything else is taken verbatim.
    pub fn resolve(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::default(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_SESSION_ID
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
