//! The renderer interface consumed by the caches

use async_trait::async_trait;
use chartview_core::{ChartValues, RenderedRelease, Template};

use crate::error::Result;

/// Loads and renders charts from a repository URL
///
/// Every call goes to the source; callers are expected to cache.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Values declared by the chart's `values.yaml`
    async fn values(&self, repo_url: &str, chart: &str, version: &str) -> Result<ChartValues>;

    /// Template sources shipped with the chart
    async fn templates(&self, repo_url: &str, chart: &str, version: &str)
    -> Result<Vec<Template>>;

    /// Render the chart with the given override documents
    ///
    /// Each override is the text of one values file; later files take
    /// precedence over earlier ones.
    async fn render(
        &self,
        repo_url: &str,
        chart: &str,
        version: &str,
        overrides: &[String],
    ) -> Result<RenderedRelease>;
}
