//! Renderer backed by the `helm` binary
//!
//! Values and templates are read straight out of the downloaded archive.
//! Rendering shells out to `helm install --dry-run=client`, which runs the
//! real template engine without contacting a cluster, and decodes the
//! release it prints as JSON.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chartview_core::{ChartValues, RenderedRelease, Template};
use chartview_repo::IndexClient;
use tokio::process::Command;

use crate::error::{EngineError, Result};
use crate::renderer::ChartRenderer;

/// Binary looked up on `PATH` when none is configured
pub const DEFAULT_HELM_BINARY: &str = "helm";

/// Builder for [`HelmRenderer`]
pub struct HelmRendererBuilder {
    binary: PathBuf,
    timeout: Option<Duration>,
    client: Option<IndexClient>,
}

impl Default for HelmRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HelmRendererBuilder {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_HELM_BINARY),
            timeout: None,
            client: None,
        }
    }

    /// Path or name of the helm binary
    pub fn binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Timeout for repository requests
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing repository client
    pub fn client(mut self, client: IndexClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the renderer
    pub fn build(self) -> Result<HelmRenderer> {
        let client = match (self.client, self.timeout) {
            (Some(client), _) => client,
            (None, Some(timeout)) => IndexClient::with_timeout(timeout)?,
            (None, None) => IndexClient::new()?,
        };

        Ok(HelmRenderer {
            client,
            binary: self.binary,
        })
    }
}

/// Chart renderer using the repository client and the `helm` CLI
pub struct HelmRenderer {
    client: IndexClient,
    binary: PathBuf,
}

impl HelmRenderer {
    /// Create a builder
    pub fn builder() -> HelmRendererBuilder {
        HelmRendererBuilder::new()
    }

    /// The configured helm binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run_helm(&self, chart: &str, args: Vec<String>, workdir: &Path) -> Result<Vec<u8>> {
        tracing::debug!(binary = %self.binary.display(), ?args, "running helm");

        let output = Command::new(&self.binary)
            .args(&args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EngineError::HelmNotFound {
                    binary: self.binary.display().to_string(),
                },
                _ => EngineError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Render {
                chart: chart.to_string(),
                message: format!("helm exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl ChartRenderer for HelmRenderer {
    async fn values(&self, repo_url: &str, chart: &str, version: &str) -> Result<ChartValues> {
        tracing::info!(chart, version, "getting values from remote");
        let (archive, _) = self.client.fetch_chart(repo_url, chart, version).await?;
        Ok(archive.values()?)
    }

    async fn templates(
        &self,
        repo_url: &str,
        chart: &str,
        version: &str,
    ) -> Result<Vec<Template>> {
        tracing::info!(chart, version, "getting templates from remote");
        let (archive, _) = self.client.fetch_chart(repo_url, chart, version).await?;
        Ok(archive.templates)
    }

    async fn render(
        &self,
        repo_url: &str,
        chart: &str,
        version: &str,
        overrides: &[String],
    ) -> Result<RenderedRelease> {
        tracing::info!(chart, version, overrides = overrides.len(), "rendering chart");
        let (_, data) = self.client.fetch_chart(repo_url, chart, version).await?;

        let workdir = tempfile::tempdir()?;
        let archive_path = workdir.path().join(format!("{}-{}.tgz", chart, version));
        tokio::fs::write(&archive_path, &data).await?;

        let mut value_files = Vec::with_capacity(overrides.len());
        for (i, text) in overrides.iter().enumerate() {
            let file = workdir.path().join(format!("values-{}.yaml", i));
            tokio::fs::write(&file, text).await?;
            value_files.push(file);
        }

        let args = install_args(chart, &archive_path, &value_files);
        let stdout = self.run_helm(chart, args, workdir.path()).await?;
        parse_release(chart, &stdout)
    }
}

/// Arguments for a client-only dry-run install named after the chart
fn install_args(chart: &str, archive: &Path, value_files: &[PathBuf]) -> Vec<String> {
    let mut args = vec![
        "install".to_string(),
        chart.to_string(),
        archive.display().to_string(),
        "--dry-run=client".to_string(),
        "--output".to_string(),
        "json".to_string(),
    ];
    for file in value_files {
        args.push("--values".to_string());
        args.push(file.display().to_string());
    }
    args
}

/// Decode the release JSON helm prints
fn parse_release(chart: &str, stdout: &[u8]) -> Result<RenderedRelease> {
    serde_json::from_slice(stdout).map_err(|e| EngineError::Render {
        chart: chart.to_string(),
        message: format!("unreadable helm output: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_args() {
        let args = install_args(
            "app-deploy",
            Path::new("/tmp/w/app-deploy-v0.0.1.tgz"),
            &[PathBuf::from("/tmp/w/values-0.yaml")],
        );
        assert_eq!(
            args,
            vec![
                "install",
                "app-deploy",
                "/tmp/w/app-deploy-v0.0.1.tgz",
                "--dry-run=client",
                "--output",
                "json",
                "--values",
                "/tmp/w/values-0.yaml",
            ]
        );
    }

    #[test]
    fn test_parse_release() {
        let stdout = br#"{
            "name": "app-deploy",
            "namespace": "default",
            "manifest": "---\n# Source: app-deploy/templates/svc.yaml\nkind: Service\n",
            "hooks": [
                {"name": "job", "kind": "Job", "path": "app-deploy/templates/job.yaml",
                 "manifest": "kind: Job", "events": ["pre-install"]}
            ]
        }"#;

        let release = parse_release("app-deploy", stdout).unwrap();
        assert!(release.manifest.contains("kind: Service"));
        assert_eq!(release.hooks.len(), 1);
        assert_eq!(release.hooks[0].path, "app-deploy/templates/job.yaml");
    }

    #[test]
    fn test_parse_release_without_hooks() {
        let release = parse_release("app", br#"{"manifest": ""}"#).unwrap();
        assert!(release.hooks.is_empty());
    }

    #[test]
    fn test_parse_release_garbage() {
        let err = parse_release("app", b"Error: something").unwrap_err();
        assert!(matches!(err, EngineError::Render { .. }));
    }

    #[test]
    fn test_builder_defaults() {
        let renderer = HelmRenderer::builder().build().unwrap();
        assert_eq!(renderer.binary(), Path::new(DEFAULT_HELM_BINARY));

        let renderer = HelmRenderer::builder()
            .binary("/opt/helm/bin/helm")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(renderer.binary(), Path::new("/opt/helm/bin/helm"));
    }
}
