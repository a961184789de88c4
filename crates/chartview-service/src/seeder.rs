//! Bulk cache population
//!
//! One worker per repository walks every chart version and forces its
//! values and templates into the cache. Workers run concurrently up to a
//! fixed limit; inside a worker everything is sequential so a single
//! repository server never sees more than one request at a time.

use std::fmt;

use chartview_core::{ChartCoordinate, Repository};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::detail::DetailCache;

/// Repositories seeded at once unless configured otherwise
pub const DEFAULT_SEED_CONCURRENCY: usize = 8;

/// What a failed seeding step was doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStage {
    Index,
    Values,
    Templates,
}

impl fmt::Display for SeedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedStage::Index => f.write_str("index"),
            SeedStage::Values => f.write_str("values"),
            SeedStage::Templates => f.write_str("templates"),
        }
    }
}

/// One step that failed; seeding carried on past it
#[derive(Debug, Clone, Serialize)]
pub struct SeedFailure {
    pub repo: String,
    pub chart: Option<String>,
    pub version: Option<String>,
    pub stage: SeedStage,
    pub error: String,
}

impl fmt::Display for SeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repo)?;
        if let Some(chart) = &self.chart {
            write!(f, "/{}", chart)?;
        }
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        write!(f, " ({}): {}", self.stage, self.error)
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub repositories: usize,
    pub charts: usize,
    pub versions: usize,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: SeedReport) {
        self.repositories += other.repositories;
        self.charts += other.charts;
        self.versions += other.versions;
        self.failures.extend(other.failures);
    }
}

/// Drives the catalog and detail caches for every repository
#[derive(Clone)]
pub struct Seeder {
    catalog: Catalog,
    details: DetailCache,
    concurrency: usize,
}

impl Seeder {
    pub fn new(catalog: Catalog, details: DetailCache) -> Self {
        Self {
            catalog,
            details,
            concurrency: DEFAULT_SEED_CONCURRENCY,
        }
    }

    /// Limit how many repositories are seeded at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Seed every repository and wait for all workers to finish
    pub async fn seed_all(&self, repositories: &[Repository]) -> SeedReport {
        tracing::info!(
            repositories = repositories.len(),
            concurrency = self.concurrency,
            "seeding cache"
        );

        let reports: Vec<SeedReport> = stream::iter(repositories)
            .map(|repo| self.seed_repository(repo))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut total = SeedReport::default();
        for report in reports {
            total.merge(report);
        }

        tracing::info!(
            charts = total.charts,
            versions = total.versions,
            failures = total.failures.len(),
            "seeding finished"
        );
        total
    }

    async fn seed_repository(&self, repo: &Repository) -> SeedReport {
        let mut report = SeedReport {
            repositories: 1,
            ..SeedReport::default()
        };

        let charts = match self.catalog.list_charts(&repo.name).await {
            Ok(charts) => charts,
            Err(e) => {
                tracing::warn!(repo = %repo.name, error = %e, "failed to list charts");
                report.failures.push(SeedFailure {
                    repo: repo.name.clone(),
                    chart: None,
                    version: None,
                    stage: SeedStage::Index,
                    error: e.to_string(),
                });
                return report;
            }
        };

        for chart in &charts {
            report.charts += 1;
            for version in &chart.versions {
                report.versions += 1;
                let coord = ChartCoordinate::new(&repo.name, &chart.name, version);
                tracing::debug!(chart = %coord, "seeding chart version");

                if let Err(e) = self.details.values(&coord).await {
                    tracing::warn!(chart = %coord, error = %e, "failed to seed values");
                    report.failures.push(failure(&coord, SeedStage::Values, e.to_string()));
                }
                if let Err(e) = self.details.templates(&coord).await {
                    tracing::warn!(chart = %coord, error = %e, "failed to seed templates");
                    report.failures.push(failure(&coord, SeedStage::Templates, e.to_string()));
                }
            }
        }

        tracing::info!(repo = %repo.name, charts = report.charts, "repository seeded");
        report
    }
}

fn failure(coord: &ChartCoordinate, stage: SeedStage, error: String) -> SeedFailure {
    SeedFailure {
        repo: coord.repo.clone(),
        chart: Some(coord.chart.clone()),
        version: Some(coord.version.clone()),
        stage,
        error,
    }
}
