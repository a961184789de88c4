//! Store keys
//!
//! Every key is a pure function of its logical coordinates. The layout is
//! shared with existing caches, so changing a format here orphans every
//! entry written under the old one.

use std::fmt;

use crate::error::{CoreError, Result};

/// Key holding the registered repository set
pub const REPOSITORIES_KEY: &str = "repos";

/// Key holding the Kubernetes API-version catalog
pub const API_VERSIONS_KEY: &str = "api-versions";

/// Prefix of every retrieval path
const RETRIEVAL_PREFIX: &str = "/charts/manifests";

/// (repo, chart, version) triple addressing one chart version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartCoordinate {
    pub repo: String,
    pub chart: String,
    pub version: String,
}

impl ChartCoordinate {
    pub fn new(
        repo: impl Into<String>,
        chart: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            chart: chart.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ChartCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.repo, self.chart, self.version)
    }
}

/// A key in the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The registered repository set
    Repositories,
    /// The Kubernetes API-version catalog
    ApiVersions,
    /// Chart list of one repository, stored under the bare repository name
    ChartList { repo: String },
    /// Declared values of one chart version
    Values(ChartCoordinate),
    /// Template sources of one chart version
    Templates(ChartCoordinate),
    /// Render result for one chart version and override-values hash
    Manifests { chart: ChartCoordinate, hash: String },
}

impl CacheKey {
    pub fn chart_list(repo: impl Into<String>) -> Self {
        Self::ChartList { repo: repo.into() }
    }

    pub fn manifests(chart: ChartCoordinate, hash: impl Into<String>) -> Self {
        Self::Manifests {
            chart,
            hash: hash.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Repositories => f.write_str(REPOSITORIES_KEY),
            CacheKey::ApiVersions => f.write_str(API_VERSIONS_KEY),
            CacheKey::ChartList { repo } => f.write_str(repo),
            CacheKey::Values(c) => write!(f, "value-{}-{}-{}", c.repo, c.chart, c.version),
            CacheKey::Templates(c) => write!(f, "template-{}-{}-{}", c.repo, c.chart, c.version),
            CacheKey::Manifests { chart: c, hash } => {
                write!(f, "manifests-{}-{}-{}-{}", c.repo, c.chart, c.version, hash)
            }
        }
    }
}

/// Build the retrieval path for a render result
pub fn retrieval_path(chart: &ChartCoordinate, hash: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        RETRIEVAL_PREFIX, chart.repo, chart.chart, chart.version, hash
    )
}

/// Split a retrieval path back into its chart coordinate and hash
pub fn parse_retrieval_path(path: &str) -> Result<(ChartCoordinate, String)> {
    let invalid = || CoreError::InvalidRetrievalPath {
        path: path.to_string(),
    };

    let rest = path
        .strip_prefix(RETRIEVAL_PREFIX)
        .and_then(|r| r.strip_prefix('/'))
        .ok_or_else(invalid)?;

    let parts: Vec<&str> = rest.split('/').collect();
    match parts.as_slice() {
        [repo, chart, version, hash] if parts.iter().all(|p| !p.is_empty()) => Ok((
            ChartCoordinate::new(*repo, *chart, *version),
            hash.to_string(),
        )),
        _ => Err(invalid()),
    }
}
