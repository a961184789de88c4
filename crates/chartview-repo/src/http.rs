//! HTTP client for chart repositories
//!
//! Fetches `index.yaml` documents and downloads chart archives, verifying
//! the archive digest when the index publishes one.

use std::time::Duration;

use sha2::{Digest, Sha256};
use url::Url;

use crate::archive::ChartArchive;
use crate::error::{RepoError, Result};
use crate::index::{ChartEntry, RepositoryIndex};

/// Timeout applied to every repository request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const INDEX_FILE: &str = "index.yaml";

/// Repository HTTP client
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: reqwest::Client,
}

impl IndexClient {
    /// Create a client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chartview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Fetch and parse a repository's index document
    pub async fn fetch_index(&self, repo_url: &str) -> Result<RepositoryIndex> {
        let index_url = resolve(repo_url, INDEX_FILE)?;
        tracing::debug!(url = %index_url, "fetching repository index");

        let data = match self.get_bytes(index_url.as_str()).await {
            Err(RepoError::HttpError { status: 404, .. }) => {
                return Err(RepoError::IndexNotFound {
                    url: index_url.to_string(),
                });
            }
            other => other?,
        };

        RepositoryIndex::from_bytes(&data)
    }

    /// Find a chart version in a repository's index
    pub async fn locate(&self, repo_url: &str, chart: &str, version: &str) -> Result<ChartEntry> {
        let index = self.fetch_index(repo_url).await?;

        if index.get(chart).is_none() {
            return Err(RepoError::ChartNotFound {
                name: chart.to_string(),
                repo: repo_url.to_string(),
            });
        }

        index
            .get_version(chart, version)
            .cloned()
            .ok_or_else(|| RepoError::VersionNotFound {
                name: chart.to_string(),
                version: version.to_string(),
                repo: repo_url.to_string(),
            })
    }

    /// Download a chart archive
    pub async fn download(&self, repo_url: &str, entry: &ChartEntry) -> Result<Vec<u8>> {
        let url = entry
            .download_url()
            .ok_or_else(|| RepoError::ChartNotFound {
                name: entry.name.clone(),
                repo: repo_url.to_string(),
            })?;

        let full_url = resolve(repo_url, url)?;
        tracing::debug!(chart = %entry.name, version = %entry.version, url = %full_url, "downloading chart");

        let data = self.get_bytes(full_url.as_str()).await?;

        if let Some(expected_digest) = entry.digest.as_deref().filter(|d| !d.is_empty()) {
            let actual_digest = compute_digest(&data);
            if !digest_matches(expected_digest, &actual_digest) {
                return Err(RepoError::IntegrityCheckFailed {
                    name: entry.name.clone(),
                    expected: expected_digest.to_string(),
                    actual: actual_digest,
                });
            }
        }

        Ok(data)
    }

    /// Locate, download and open a chart version
    pub async fn fetch_chart(
        &self,
        repo_url: &str,
        chart: &str,
        version: &str,
    ) -> Result<(ChartArchive, Vec<u8>)> {
        let entry = self.locate(repo_url, chart, version).await?;
        let data = self.download(repo_url, &entry).await?;
        let archive = ChartArchive::from_bytes(&data)?;
        Ok((archive, data))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Resolve a possibly relative reference against a repository URL
fn resolve(repo_url: &str, reference: &str) -> Result<Url> {
    let invalid = |e: url::ParseError| RepoError::InvalidRepositoryUrl {
        url: repo_url.to_string(),
        reason: e.to_string(),
    };

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Url::parse(reference).map_err(invalid);
    }

    // Without the trailing slash `join` would replace the last path segment
    let base = format!("{}/", repo_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|b| b.join(reference))
        .map_err(invalid)
}

/// Compute SHA256 digest of data
fn compute_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Compare digests, tolerating the `sha256:` and `sha256-` prefixes and case
fn digest_matches(expected: &str, actual: &str) -> bool {
    fn normalize(d: &str) -> String {
        d.trim()
            .to_lowercase()
            .replace("sha256:", "")
            .replace("sha256-", "")
    }
    normalize(expected) == normalize(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_digest() {
        let digest = compute_digest(b"hello world");
        assert_eq!(
            digest,
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_digest_matches() {
        assert!(digest_matches("sha256:abc123", "sha256:ABC123"));
        assert!(digest_matches("sha256:abc123", "abc123"));
        assert!(digest_matches("sha256:abc123", "sha256-abc123"));
        assert!(!digest_matches("sha256:abc123", "sha256:xyz789"));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("https://charts.example.com/stable", "index.yaml")
                .unwrap()
                .as_str(),
            "https://charts.example.com/stable/index.yaml"
        );
        assert_eq!(
            resolve("https://charts.example.com/stable/", "app-0.1.0.tgz")
                .unwrap()
                .as_str(),
            "https://charts.example.com/stable/app-0.1.0.tgz"
        );
        assert_eq!(
            resolve("https://a.example.com/x", "https://b.example.com/app.tgz")
                .unwrap()
                .as_str(),
            "https://b.example.com/app.tgz"
        );
        assert!(matches!(
            resolve("not a url", "index.yaml"),
            Err(RepoError::InvalidRepositoryUrl { .. })
        ));
    }
}
