//! Chartview Core - Core types for the chart catalog and render cache
//!
//! This crate provides the foundational types used throughout chartview:
//! - `Repository`, `Chart`, `ChartDetail`: the catalog model
//! - `ChartValues`: declared chart values with JSON fidelity
//! - `CacheKey`: deterministic store keys for every cached coordinate
//! - `content_hash`: the digest that content-addresses override values
//! - `ManifestSet`: split, filtered rendered manifests
//! - `Analyzer`: API-version compatibility checks for templates

pub mod analyzer;
pub mod digest;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod model;
pub mod values;

pub use analyzer::{Analyzer, extract_api_version};
pub use digest::content_hash;
pub use error::{CoreError, Result};
pub use keys::{
    API_VERSIONS_KEY, CacheKey, ChartCoordinate, REPOSITORIES_KEY, parse_retrieval_path,
    retrieval_path,
};
pub use manifest::{HookManifest, Manifest, ManifestSet, RenderedRelease, TEST_DIRECTORY};
pub use model::{
    Chart, ChartDetail, CompatibilityEntry, CompatibilityReport, KubeApiVersions, RenderResult,
    Repository, Template,
};
pub use values::ChartValues;
