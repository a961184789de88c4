//! Shared fixtures: a counting renderer and a mocked chart repository

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chartview_core::{ChartValues, HookManifest, RenderedRelease, Template};
use chartview_engine::{ChartRenderer, EngineError};
use chartview_repo::IndexClient;
use chartview_service::ChartService;
use chartview_store::MemoryStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Chart the fake renderer pretends does not exist
pub const MISSING_CHART: &str = "ghost";

pub const INDEX: &str = r#"apiVersion: v1
entries:
  zookeeper:
    - name: zookeeper
      version: "3.5.0"
      urls: [zookeeper-3.5.0.tgz]
  app-deploy:
    - name: app-deploy
      version: v0.0.1
      urls: [app-deploy-v0.0.1.tgz]
    - name: app-deploy
      version: v0.0.2
      urls: [app-deploy-v0.0.2.tgz]
"#;

/// Renderer double counting every call
#[derive(Default)]
pub struct FakeRenderer {
    pub values_calls: AtomicUsize,
    pub templates_calls: AtomicUsize,
    pub render_calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
    fail_render: bool,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_render: true,
            ..Self::default()
        }
    }

    pub fn renders(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }

    pub fn values_fetches(&self) -> usize {
        self.values_calls.load(Ordering::SeqCst)
    }

    /// Most calls ever running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self, chart: &str, version: &str) -> Result<(), EngineError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if chart == MISSING_CHART {
            return Err(EngineError::VersionNotFound {
                chart: chart.to_string(),
                version: version.to_string(),
                repo: "fake".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChartRenderer for FakeRenderer {
    async fn values(
        &self,
        _repo_url: &str,
        chart: &str,
        version: &str,
    ) -> chartview_engine::Result<ChartValues> {
        self.values_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(chart, version).await?;
        Ok(ChartValues::from_yaml("affinity: {}\nreplicaCount: 1\n").expect("valid values"))
    }

    async fn templates(
        &self,
        _repo_url: &str,
        chart: &str,
        version: &str,
    ) -> chartview_engine::Result<Vec<Template>> {
        self.templates_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(chart, version).await?;
        Ok(vec![
            Template::new("templates/_helpers.tpl", "{{- define \"app.name\" -}}app{{- end }}"),
            Template::new("templates/deployment.yaml", "apiVersion: apps/v1\nkind: Deployment"),
            Template::new(
                "templates/ingress.yaml",
                "apiVersion: extensions/v1beta1\nkind: Ingress",
            ),
        ])
    }

    async fn render(
        &self,
        _repo_url: &str,
        chart: &str,
        version: &str,
        _overrides: &[String],
    ) -> chartview_engine::Result<RenderedRelease> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(chart, version).await?;

        if self.fail_render {
            return Err(EngineError::Render {
                chart: chart.to_string(),
                message: "template: deployment.yaml: nil pointer".to_string(),
            });
        }

        Ok(RenderedRelease {
            manifest: format!(
                "---\n# Source: {c}/templates/deployment.yaml\nkind: Deployment\n---\n# Source: {c}/templates/tests/test-connection.yaml\nkind: Pod\n",
                c = chart
            ),
            hooks: vec![HookManifest {
                path: format!("{}/templates/job.yaml", chart),
                manifest: "kind: Job".to_string(),
            }],
        })
    }
}

/// Serve `INDEX` under `/stable`
pub async fn chart_repository() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stable/index.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
        .mount(&server)
        .await;
    server
}

/// A service over a fresh memory store with `stable` pointing at `repo_url`
pub async fn service_with(
    renderer: Arc<FakeRenderer>,
    repo_url: &str,
) -> (ChartService, MemoryStore) {
    let store = MemoryStore::new();
    let service = ChartService::new(
        Arc::new(store.clone()),
        renderer,
        IndexClient::new().expect("http client"),
    );

    let repos = format!(r#"[{{"name":"stable","url":"{}"}}]"#, repo_url);
    service.register_repositories(&repos).await.expect("register");
    (service, store)
}
