//! Chartview Service - Chart catalog and render cache orchestration
//!
//! Everything expensive (repository indexes, chart values and templates,
//! rendered manifests) is cached in a [`KeyValueStore`] under deterministic
//! keys:
//! - `Catalog`: chart lists, keyed by repository name
//! - `DetailCache`: values and templates, keyed by chart version
//! - `RenderCache`: manifests, keyed by chart version and override hash
//! - `Seeder`: fills the catalog and detail caches for every repository
//!
//! Concurrent misses on one key are collapsed by [`SingleFlight`].
//!
//! [`KeyValueStore`]: chartview_store::KeyValueStore

pub mod cache;
pub mod catalog;
pub mod detail;
pub mod error;
pub mod flight;
pub mod registry;
pub mod render;
pub mod seeder;
pub mod service;

pub use cache::Cache;
pub use catalog::Catalog;
pub use detail::{AnalyzedChart, DetailCache};
pub use error::{Result, ServiceError};
pub use flight::SingleFlight;
pub use registry::Registry;
pub use render::RenderCache;
pub use seeder::{DEFAULT_SEED_CONCURRENCY, SeedFailure, SeedReport, SeedStage, Seeder};
pub use service::ChartService;
