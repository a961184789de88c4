//! Rendered manifest splitting
//!
//! A chart render produces one text stream of YAML documents. Each document
//! carries a `# Source: <chart>/<path>` comment naming the template it came
//! from; that comment is the only way to tell documents apart, so documents
//! without one are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Templates under this directory are chart tests, never part of a render result
pub const TEST_DIRECTORY: &str = "tests";

const DOCUMENT_SEPARATOR: &str = "---\n";

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s*\n)---\s*").expect("valid regex"));

static SOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"# Source: [^/]+/(.+)").expect("valid regex"));

/// One rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Path relative to the chart's templates directory
    pub name: String,
    pub content: String,
}

impl Manifest {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A lifecycle hook emitted alongside the main manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookManifest {
    /// Source path of the hook template (`<chart>/templates/...`)
    pub path: String,
    pub manifest: String,
}

/// Raw renderer output before splitting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRelease {
    pub manifest: String,

    #[serde(default)]
    pub hooks: Vec<HookManifest>,
}

impl RenderedRelease {
    /// Concatenate the main manifest and every hook into one stream
    ///
    /// Hooks get an explicit source header so they split like templates.
    pub fn combined(&self) -> String {
        let mut out = String::new();
        out.push_str(self.manifest.trim());
        out.push('\n');
        for hook in &self.hooks {
            out.push_str(&format!("---\n # Source: {}\n{}\n", hook.path, hook.manifest));
        }
        out
    }
}

/// Ordered, filtered manifests of one render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestSet(pub Vec<Manifest>);

impl ManifestSet {
    /// Split a rendered stream into named manifests
    ///
    /// Order follows the stream, not the names. Documents with no source
    /// comment, with an empty derived path, or under [`TEST_DIRECTORY`] are
    /// dropped.
    pub fn from_rendered(text: &str) -> Self {
        let manifests = split_documents(text)
            .into_iter()
            .filter_map(|doc| {
                let name = source_path(&doc)?;
                if is_test_path(&name) {
                    return None;
                }
                Some(Manifest { name, content: doc })
            })
            .collect();
        Self(manifests)
    }

    /// Split a renderer's release output
    pub fn from_release(release: &RenderedRelease) -> Self {
        Self::from_rendered(&release.combined())
    }

    /// Join manifests back into one multi-document stream
    pub fn stringify(&self) -> String {
        let mut out = String::new();
        for manifest in &self.0 {
            out.push_str(DOCUMENT_SEPARATOR);
            out.push_str(&manifest.content);
            out.push('\n');
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Manifest> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Manifest>> for ManifestSet {
    fn from(manifests: Vec<Manifest>) -> Self {
        Self(manifests)
    }
}

/// Split a multi-document stream on `---` separators
///
/// Documents are trimmed; blank documents are skipped.
pub fn split_documents(text: &str) -> Vec<String> {
    let padded = format!("\n{}", text);
    SEPARATOR_RE
        .split(&padded)
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive a manifest name from its `# Source:` comment
///
/// The chart directory and the templates directory are both stripped:
/// `mychart/templates/web/deployment.yaml` becomes `web/deployment.yaml`.
pub fn source_path(document: &str) -> Option<String> {
    let captured = SOURCE_RE.captures(document)?.get(1)?.as_str().trim_end();
    let path = captured
        .split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if path.is_empty() { None } else { Some(path) }
}

fn is_test_path(path: &str) -> bool {
    path.split('/').next() == Some(TEST_DIRECTORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = r#"---
# Source: app-deploy/templates/service.yaml
apiVersion: v1
kind: Service
---
# Source: app-deploy/templates/deployment.yaml
apiVersion: apps/v1
kind: Deployment
---
# Source: app-deploy/templates/tests/test-connection.yaml
apiVersion: v1
kind: Pod
---
kind: Orphan
"#;

    #[test]
    fn test_split_documents() {
        let docs = split_documents("a: 1\n---\nb: 2\n---   \n\nc: 3\n---\n");
        assert_eq!(docs, vec!["a: 1", "b: 2", "c: 3"]);
    }

    #[test]
    fn test_split_ignores_inline_dashes() {
        let docs = split_documents("text: a---b\n---\nc: 3");
        assert_eq!(docs, vec!["text: a---b", "c: 3"]);
    }

    #[test]
    fn test_source_path() {
        assert_eq!(
            source_path("# Source: app/templates/deployment.yaml\nkind: Deployment"),
            Some("deployment.yaml".to_string())
        );
        assert_eq!(
            source_path(" # Source: app/templates/web/ingress.yaml \nkind: Ingress"),
            Some("web/ingress.yaml".to_string())
        );
        assert_eq!(source_path("# Source: app/NOTES.txt"), None);
        assert_eq!(source_path("kind: Deployment"), None);
    }

    #[test]
    fn test_from_rendered_keeps_stream_order() {
        let set = ManifestSet::from_rendered(RENDERED);
        let names: Vec<_> = set.iter().map(|m| m.name.as_str()).collect();
        // service before deployment: stream order, not name order
        assert_eq!(names, vec!["service.yaml", "deployment.yaml"]);
    }

    #[test]
    fn test_from_rendered_drops_tests_and_unsourced() {
        let set = ManifestSet::from_rendered(RENDERED);
        assert!(set.iter().all(|m| !m.name.starts_with("tests/")));
        assert!(set.iter().all(|m| !m.content.contains("Orphan")));
    }

    #[test]
    fn test_content_keeps_source_comment() {
        let set = ManifestSet::from_rendered(RENDERED);
        assert_eq!(
            set.0[1].content,
            "# Source: app-deploy/templates/deployment.yaml\napiVersion: apps/v1\nkind: Deployment"
        );
    }

    #[test]
    fn test_hooks_are_appended_with_source_header() {
        let release = RenderedRelease {
            manifest: "---\n# Source: app/templates/cm.yaml\nkind: ConfigMap\n\n".to_string(),
            hooks: vec![
                HookManifest {
                    path: "app/templates/job.yaml".to_string(),
                    manifest: "kind: Job".to_string(),
                },
                HookManifest {
                    path: "app/templates/tests/smoke.yaml".to_string(),
                    manifest: "kind: Pod".to_string(),
                },
            ],
        };

        let set = ManifestSet::from_release(&release);
        let names: Vec<_> = set.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["cm.yaml", "job.yaml"]);
        assert_eq!(set.0[1].content, "# Source: app/templates/job.yaml\nkind: Job");
    }

    #[test]
    fn test_rendered_stream_snapshot() {
        let set = ManifestSet::from_rendered(RENDERED);
        insta::assert_snapshot!(set.stringify(), @r"
        ---
        # Source: app-deploy/templates/service.yaml
        apiVersion: v1
        kind: Service
        ---
        # Source: app-deploy/templates/deployment.yaml
        apiVersion: apps/v1
        kind: Deployment
        ");
    }

    #[test]
    fn test_stringify() {
        let set = ManifestSet::from(vec![
            Manifest::new("deployment.yaml", "kind: Deployment"),
            Manifest::new("service.yaml", "kind: Service"),
        ]);
        assert_eq!(
            set.stringify(),
            "---\nkind: Deployment\n---\nkind: Service\n"
        );
        assert_eq!(ManifestSet::default().stringify(), "");
    }
}
