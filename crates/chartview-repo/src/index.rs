//! Repository index types
//!
//! Helm-compatible `index.yaml` format. Only the fields the catalog and the
//! downloader read are modelled; everything else in the document is ignored.

use std::collections::BTreeMap;

use chartview_core::Chart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, Result};

/// Repository index (Helm-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryIndex {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// When this index was generated
    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,

    /// Chart versions keyed by chart name
    ///
    /// A sorted map so that listing charts never depends on hash order.
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<ChartEntry>>,
}

fn default_api_version() -> String {
    "v1".to_string()
}


impl RepositoryIndex {
    /// Parse index from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RepoError::IndexParseError {
            message: e.to_string(),
        })
    }

    /// Parse index from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let yaml = std::str::from_utf8(bytes).map_err(|e| RepoError::IndexParseError {
            message: format!("Invalid UTF-8: {}", e),
        })?;
        Self::from_yaml(yaml)
    }

    /// Get all versions of a chart
    pub fn get(&self, name: &str) -> Option<&Vec<ChartEntry>> {
        self.entries.get(name)
    }

    /// Get a specific version of a chart
    pub fn get_version(&self, name: &str, version: &str) -> Option<&ChartEntry> {
        self.entries
            .get(name)?
            .iter()
            .find(|e| e.version == version)
    }

    /// Project the index into the catalog's chart list
    ///
    /// Charts are ordered by name; versions keep the order the index lists
    /// them in.
    pub fn charts(&self) -> Vec<Chart> {
        self.entries
            .iter()
            .map(|(name, versions)| Chart {
                name: name.clone(),
                versions: versions.iter().map(|e| e.version.clone()).collect(),
            })
            .collect()
    }
}

/// Chart entry in the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    /// Chart name
    pub name: String,

    /// Chart version
    pub version: String,

    /// Application version
    #[serde(default)]
    pub app_version: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// URLs to download the chart archive, absolute or relative to the repository
    #[serde(default)]
    pub urls: Vec<String>,

    /// SHA256 digest of the archive
    #[serde(default)]
    pub digest: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    /// Deprecated flag
    #[serde(default)]
    pub deprecated: bool,
}

impl ChartEntry {
    /// Get the primary download URL
    pub fn download_url(&self) -> Option<&str> {
        self.urls.first().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> RepositoryIndex {
        let yaml = r#"
apiVersion: v1
generated: "2024-01-01T00:00:00Z"
entries:
  redis:
    - name: redis
      version: "17.0.0"
      description: Redis database
      urls:
        - https://example.com/charts/redis-17.0.0.tgz
  app-deploy:
    - name: app-deploy
      version: v0.0.2
      appVersion: "1.25.0"
      urls:
        - app-deploy-v0.0.2.tgz
      digest: "sha256:abc123"
    - name: app-deploy
      version: v0.0.1
      urls:
        - app-deploy-v0.0.1.tgz
      created: "2023-05-01T10:00:00Z"
      deprecated: true
"#;
        RepositoryIndex::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_parse_index() {
        let index = sample_index();
        assert_eq!(index.entries.len(), 2);
        assert!(index.generated.is_some());
        assert!(index.get("redis").is_some());
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_get_version() {
        let index = sample_index();
        let entry = index.get_version("app-deploy", "v0.0.2").unwrap();
        assert_eq!(entry.app_version.as_deref(), Some("1.25.0"));
        assert_eq!(entry.download_url(), Some("app-deploy-v0.0.2.tgz"));
        assert!(index.get_version("app-deploy", "v9.9.9").is_none());
    }

    #[test]
    fn test_charts_sorted_by_name_versions_in_index_order() {
        let charts = sample_index().charts();
        let names: Vec<_> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["app-deploy", "redis"]);
        assert_eq!(charts[0].versions, vec!["v0.0.2", "v0.0.1"]);
    }

    #[test]
    fn test_minimal_index() {
        let index = RepositoryIndex::from_yaml("entries: {}").unwrap();
        assert_eq!(index.api_version, "v1");
        assert!(index.charts().is_empty());
    }

    #[test]
    fn test_invalid_index() {
        let err = RepositoryIndex::from_yaml("entries: [unclosed").unwrap_err();
        assert!(matches!(err, RepoError::IndexParseError { .. }));

        let err = RepositoryIndex::from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, RepoError::IndexParseError { .. }));
    }
}
