//! Content-addressed render results
//!
//! A render is cached under the hash of its raw override payload. The
//! payload is hashed byte for byte, so two payloads that mean the same
//! values but differ in whitespace are rendered and cached separately.

use std::sync::Arc;

use chartview_core::{
    CacheKey, ChartCoordinate, ManifestSet, RenderResult, content_hash, retrieval_path,
};
use chartview_engine::ChartRenderer;

use crate::cache::Cache;
use crate::error::{Result, ServiceError};
use crate::registry::Registry;

/// Render results keyed by chart version and override hash
#[derive(Clone)]
pub struct RenderCache {
    cache: Arc<Cache>,
    registry: Registry,
    renderer: Arc<dyn ChartRenderer>,
}

impl RenderCache {
    pub fn new(cache: Arc<Cache>, registry: Registry, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            cache,
            registry,
            renderer,
        }
    }

    /// Render a chart version with an override payload
    ///
    /// A miss is rendered on a detached task: if the caller goes away the
    /// render still completes and is cached for the next request.
    pub async fn render(&self, chart: &ChartCoordinate, overrides: &[u8]) -> Result<RenderResult> {
        let hash = content_hash(overrides);
        if let Some(hit) = self.lookup(chart, &hash).await? {
            tracing::debug!(%chart, hash = %hash, "render cache hit");
            return Ok(hit);
        }

        let this = self.clone();
        let chart = chart.clone();
        let overrides = overrides.to_vec();
        tokio::spawn(async move { this.populate(chart, hash, overrides).await })
            .await
            .map_err(|e| ServiceError::Task {
                message: e.to_string(),
            })?
    }

    /// The cached result for a hash, if any
    pub async fn lookup(&self, chart: &ChartCoordinate, hash: &str) -> Result<Option<RenderResult>> {
        let key = CacheKey::manifests(chart.clone(), hash).to_string();
        self.cache.read(&key).await
    }

    /// The cached manifests joined into one multi-document stream
    ///
    /// Read-only: a miss yields an empty string and never renders.
    pub async fn stringified(&self, chart: &ChartCoordinate, hash: &str) -> Result<String> {
        Ok(self
            .lookup(chart, hash)
            .await?
            .map(|result| result.manifests.stringify())
            .unwrap_or_default())
    }

    async fn populate(
        &self,
        chart: ChartCoordinate,
        hash: String,
        overrides: Vec<u8>,
    ) -> Result<RenderResult> {
        let key = CacheKey::manifests(chart.clone(), hash.as_str()).to_string();

        self.cache
            .get_or_populate(&key, || async {
                let text = String::from_utf8(overrides).map_err(|e| ServiceError::InvalidInput {
                    message: format!("override values are not UTF-8: {}", e),
                })?;

                let url = self.registry.resolve_url(&chart.repo).await?;
                tracing::info!(%chart, hash = %hash, "rendering manifests");

                let release = self
                    .renderer
                    .render(&url, &chart.chart, &chart.version, &[text])
                    .await
                    .map_err(|e| ServiceError::from_engine(&chart, e))?;

                Ok(RenderResult {
                    retrieval_path: retrieval_path(&chart, &hash),
                    manifests: ManifestSet::from_release(&release),
                })
            })
            .await
    }
}
