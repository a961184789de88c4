//! The service facade handed to request handlers and the seed command

use std::sync::Arc;

use chartview_core::{
    Chart, ChartCoordinate, ChartDetail, ChartValues, KubeApiVersions, RenderResult, Repository,
    Template,
};
use chartview_engine::ChartRenderer;
use chartview_repo::IndexClient;
use chartview_store::KeyValueStore;

use crate::cache::Cache;
use crate::catalog::Catalog;
use crate::detail::{AnalyzedChart, DetailCache};
use crate::error::Result;
use crate::registry::Registry;
use crate::render::RenderCache;
use crate::seeder::{DEFAULT_SEED_CONCURRENCY, SeedReport, Seeder};

/// Every chart operation over one store
///
/// Cheap to clone; clones share the store and the in-flight map.
#[derive(Clone)]
pub struct ChartService {
    registry: Registry,
    catalog: Catalog,
    details: DetailCache,
    renders: RenderCache,
    seed_concurrency: usize,
}

impl ChartService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn ChartRenderer>,
        client: IndexClient,
    ) -> Self {
        let cache = Arc::new(Cache::new(store));
        let registry = Registry::new(Arc::clone(&cache));

        Self {
            catalog: Catalog::new(Arc::clone(&cache), registry.clone(), client),
            details: DetailCache::new(Arc::clone(&cache), registry.clone(), Arc::clone(&renderer)),
            renders: RenderCache::new(cache, registry.clone(), renderer),
            registry,
            seed_concurrency: DEFAULT_SEED_CONCURRENCY,
        }
    }

    /// Limit how many repositories are seeded at once
    pub fn with_seed_concurrency(mut self, concurrency: usize) -> Self {
        self.seed_concurrency = concurrency.max(1);
        self
    }

    // ============ Registry ============

    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        self.registry.repositories().await
    }

    pub async fn register_repositories(&self, payload: &str) -> Result<Vec<Repository>> {
        self.registry.register_raw(payload).await
    }

    pub async fn add_repository(&self, repo: Repository) -> Result<()> {
        self.registry.add(repo).await
    }

    pub async fn register_api_versions(&self, payload: &str) -> Result<Vec<KubeApiVersions>> {
        self.registry.register_api_versions_raw(payload).await
    }

    pub async fn supported_api_versions(&self, kube_version: &str) -> Result<Vec<String>> {
        self.registry.supported_api_versions(kube_version).await
    }

    // ============ Catalog ============

    pub async fn list_charts(&self, repo: &str) -> Result<Vec<Chart>> {
        self.catalog.list_charts(repo).await
    }

    // ============ Details ============

    pub async fn values(&self, chart: &ChartCoordinate) -> Result<ChartValues> {
        self.details.values(chart).await
    }

    pub async fn templates(&self, chart: &ChartCoordinate) -> Result<Vec<Template>> {
        self.details.templates(chart).await
    }

    pub async fn chart(&self, chart: &ChartCoordinate) -> Result<ChartDetail> {
        self.details.chart(chart).await
    }

    pub async fn analyze(&self, chart: &ChartCoordinate, kube_version: &str) -> Result<AnalyzedChart> {
        self.details.analyze(chart, kube_version).await
    }

    // ============ Rendering ============

    pub async fn render(&self, chart: &ChartCoordinate, overrides: &[u8]) -> Result<RenderResult> {
        self.renders.render(chart, overrides).await
    }

    pub async fn stringified(&self, chart: &ChartCoordinate, hash: &str) -> Result<String> {
        self.renders.stringified(chart, hash).await
    }

    // ============ Seeding ============

    /// Seed every registered repository
    pub async fn seed(&self) -> Result<SeedReport> {
        let repositories = self.registry.repositories().await?;
        Ok(self.seeder().seed_all(&repositories).await)
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.catalog.clone(), self.details.clone()).with_concurrency(self.seed_concurrency)
    }
}
