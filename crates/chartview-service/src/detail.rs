//! Declared values and template sources per chart version

use std::sync::Arc;

use chartview_core::{
    Analyzer, CacheKey, ChartCoordinate, ChartDetail, ChartValues, CompatibilityReport, Template,
};
use chartview_engine::ChartRenderer;
use serde::{Deserialize, Serialize};

use crate::cache::Cache;
use crate::error::{Result, ServiceError};
use crate::registry::Registry;

/// Chart values alongside the compatibility of its templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedChart {
    pub values: ChartValues,
    pub templates: CompatibilityReport,
}

/// Values and templates, cached independently of each other
#[derive(Clone)]
pub struct DetailCache {
    cache: Arc<Cache>,
    registry: Registry,
    renderer: Arc<dyn ChartRenderer>,
}

impl DetailCache {
    pub fn new(cache: Arc<Cache>, registry: Registry, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            cache,
            registry,
            renderer,
        }
    }

    pub async fn values(&self, chart: &ChartCoordinate) -> Result<ChartValues> {
        let key = CacheKey::Values(chart.clone()).to_string();

        self.cache
            .get_or_populate(&key, || async {
                let url = self.registry.resolve_url(&chart.repo).await?;
                self.renderer
                    .values(&url, &chart.chart, &chart.version)
                    .await
                    .map_err(|e| ServiceError::from_engine(chart, e))
            })
            .await
    }

    pub async fn templates(&self, chart: &ChartCoordinate) -> Result<Vec<Template>> {
        let key = CacheKey::Templates(chart.clone()).to_string();

        self.cache
            .get_or_populate(&key, || async {
                let url = self.registry.resolve_url(&chart.repo).await?;
                self.renderer
                    .templates(&url, &chart.chart, &chart.version)
                    .await
                    .map_err(|e| ServiceError::from_engine(chart, e))
            })
            .await
    }

    /// Values and templates together; either failing fails the whole call
    pub async fn chart(&self, chart: &ChartCoordinate) -> Result<ChartDetail> {
        let values = self.values(chart).await?;
        let templates = self.templates(chart).await?;
        Ok(ChartDetail { values, templates })
    }

    /// Values plus the templates' compatibility with a Kubernetes version
    ///
    /// An unknown Kubernetes version supports nothing, so every template
    /// that declares an apiVersion is reported incompatible.
    pub async fn analyze(&self, chart: &ChartCoordinate, kube_version: &str) -> Result<AnalyzedChart> {
        let detail = self.chart(chart).await?;
        let supported = self.registry.supported_api_versions(kube_version).await?;
        let templates = Analyzer::new().analyze(&detail.templates, &supported)?;

        Ok(AnalyzedChart {
            values: detail.values,
            templates,
        })
    }
}
