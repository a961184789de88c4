//! Server settings
//!
//! Settings come from an optional YAML file; command-line flags (and the
//! environment variables behind them) override individual fields.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chartview_engine::{DEFAULT_HELM_BINARY, HelmRenderer};
use chartview_repo::IndexClient;
use chartview_service::{ChartService, DEFAULT_SEED_CONCURRENCY};
use chartview_store::{KeyValueStore, MemoryStore, RedisStore, SqliteStore};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Key-value store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Sqlite,
    Redis,
}

/// Everything needed to build the chart service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,

    /// SQLite database file; the user cache directory when unset
    pub sqlite_path: Option<PathBuf>,

    pub helm_binary: PathBuf,

    /// Repositories seeded at once
    pub seed_concurrency: usize,

    /// Timeout for repository requests, in seconds
    pub request_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9999,
            store: StoreKind::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            sqlite_path: None,
            helm_binary: PathBuf::from(DEFAULT_HELM_BINARY),
            seed_concurrency: DEFAULT_SEED_CONCURRENCY,
            request_timeout: 30,
        }
    }
}

/// Flag overrides; `None` leaves the file or default value in place
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SettingsArgs {
    /// Settings file (YAML)
    #[arg(long, global = true, env = "CHARTVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, global = true, env = "CHARTVIEW_HOST")]
    pub host: Option<String>,

    /// Port the HTTP server listens on
    #[arg(long, global = true, env = "CHARTVIEW_PORT")]
    pub port: Option<u16>,

    /// Key-value store backend
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Redis connection URL
    #[arg(long, global = true, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub sqlite_path: Option<PathBuf>,

    /// helm binary used for rendering
    #[arg(long, global = true, env = "HELM_BINARY")]
    pub helm_binary: Option<PathBuf>,

    /// Repositories seeded at once
    #[arg(long, global = true)]
    pub seed_concurrency: Option<usize>,
}

impl Settings {
    /// Load a settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config_with_help(
                format!("cannot read {}: {}", path.display(), e),
                "pass an existing file to --config",
            )
        })?;

        serde_yaml::from_str(&content)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve settings from an optional file and flag overrides
    pub fn resolve(args: &SettingsArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(host) = &args.host {
            settings.host = host.clone();
        }
        if let Some(port) = args.port {
            settings.port = port;
        }
        if let Some(store) = args.store {
            settings.store = store;
        }
        if let Some(url) = &args.redis_url {
            settings.redis_url = url.clone();
        }
        if let Some(path) = &args.sqlite_path {
            settings.sqlite_path = Some(path.clone());
        }
        if let Some(binary) = &args.helm_binary {
            settings.helm_binary = binary.clone();
        }
        if let Some(concurrency) = args.seed_concurrency {
            settings.seed_concurrency = concurrency;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.seed_concurrency == 0 {
            return Err(CliError::config("seed_concurrency must be at least 1"));
        }
        if self.request_timeout == 0 {
            return Err(CliError::config("request_timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// Open the configured store
    pub async fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            StoreKind::Memory => {
                tracing::warn!("using the in-memory store; the cache is lost on exit");
                Arc::new(MemoryStore::new())
            }
            StoreKind::Sqlite => match &self.sqlite_path {
                Some(path) => Arc::new(SqliteStore::open_at(path)?),
                None => Arc::new(SqliteStore::open()?),
            },
            StoreKind::Redis => Arc::new(RedisStore::connect(&self.redis_url).await?),
        };
        Ok(store)
    }

    /// Build the chart service over the configured store and renderer
    pub async fn build_service(&self) -> Result<ChartService> {
        let store = self.open_store().await?;
        let client = IndexClient::with_timeout(Duration::from_secs(self.request_timeout))
            .map_err(|e| CliError::internal(e.to_string()))?;
        let renderer = HelmRenderer::builder()
            .binary(&self.helm_binary)
            .client(client.clone())
            .build()
            .map_err(|e| CliError::internal(e.to_string()))?;

        Ok(ChartService::new(store, Arc::new(renderer), client)
            .with_seed_concurrency(self.seed_concurrency))
    }
}
