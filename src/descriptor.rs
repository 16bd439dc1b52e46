//! Tool descriptor value type.
//!
//! The cache stores descriptors without interpreting them: `metadata` is an
//! opaque JSON payload owned by whatever component registers the tool
//! (schemas, annotations, transport hints). Only `name` exists so callers
//! and logs have something human-readable to refer to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool's metadata as supplied by an external registrar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Value::Null,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let tool = ToolDescriptor::new("web_search").with_metadata(json!({"read_only": true}));
        assert_eq!(tool.name, "web_search");
        assert_eq!(tool.metadata["read_only"], json!(true));
    }

    #[test]
    fn test_null_metadata_is_omitted() {
        let json = serde_json::to_string(&ToolDescriptor::new("t")).unwrap();
        assert_eq!(json, r#"{"name":"t"}"#);
        let back: ToolDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metadata, Value::Null);
    }
}
