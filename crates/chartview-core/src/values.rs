//! Declared chart values

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Values declared by a chart's `values.yaml`
///
/// Backed by a JSON value whose maps keep insertion order, so a chart's
/// declared key order survives the round trip through the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartValues(pub JsonValue);

impl ChartValues {
    /// Create empty values
    pub fn new() -> Self {
        Self(JsonValue::Object(serde_json::Map::new()))
    }

    /// Parse values from YAML string
    ///
    /// An empty document yields empty values rather than `null`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        match value {
            JsonValue::Null => Ok(Self::new()),
            other => Ok(Self(other)),
        }
    }

    /// Parse values from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Ok(Self(value))
    }

    /// Get a value by dotted path
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        path.split('.')
            .try_fold(&self.0, |current, part| current.as_object()?.get(part))
    }

    /// Check if values are empty
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Null => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_nested() {
        let values = ChartValues::from_yaml(
            r#"
affinity: {}
cloneHtdocsFromGit:
  enabled: false
  interval: 60
"#,
        )
        .unwrap();

        assert_eq!(values.get("cloneHtdocsFromGit.enabled"), Some(&JsonValue::Bool(false)));
        assert_eq!(values.get("cloneHtdocsFromGit.interval").and_then(|v| v.as_i64()), Some(60));
        assert!(values.get("affinity.missing").is_none());
    }

    #[test]
    fn test_empty_document_is_empty_map() {
        let values = ChartValues::from_yaml("").unwrap();
        assert!(values.is_empty());
        assert_eq!(serde_json::to_string(&values).unwrap(), "{}");
    }

    #[test]
    fn test_key_order_preserved() {
        let values = ChartValues::from_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2,"mid":3}"#);

        let back = ChartValues::from_json(&json).unwrap();
        assert_eq!(back, values);
    }
}
