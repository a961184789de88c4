//! Catalog data model
//!
//! Every type here is persisted as JSON in the key-value store, so field
//! names are part of the stored format and must not drift.

use serde::{Deserialize, Serialize};

use crate::manifest::ManifestSet;
use crate::values::ChartValues;

/// A registered chart repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique name for this repository
    pub name: String,

    /// Base URL serving `index.yaml`
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A chart and every version its repository publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,

    /// Versions in index document order
    pub versions: Vec<String>,
}

/// A template source file as shipped in the chart archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Path relative to the chart root (e.g. `templates/deployment.yaml`)
    pub name: String,
    pub content: String,
}

impl Template {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Declared values and template sources of one chart version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDetail {
    pub values: ChartValues,
    pub templates: Vec<Template>,
}

/// Cached outcome of a render request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Locator that resolves back to `manifests`
    #[serde(rename = "url", alias = "retrievalPath")]
    pub retrieval_path: String,

    pub manifests: ManifestSet,
}

/// Compatibility verdict for one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub template: Template,
    pub compatible: bool,
}

/// One entry per template that declared an apiVersion
pub type CompatibilityReport = Vec<CompatibilityEntry>;

/// API versions served by one Kubernetes release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeApiVersions {
    pub kube_version: String,

    #[serde(default)]
    pub api_versions: Vec<String>,
}
