//! Template compatibility analysis
//!
//! Chart templates are not valid YAML until rendered, so the analyzer never
//! parses a whole template. It looks for the first line mentioning
//! `apiVersion` and parses only that line.

use serde_yaml::Value as YamlValue;

use crate::error::{CoreError, Result};
use crate::model::{CompatibilityEntry, CompatibilityReport, Template};

const API_VERSION_FIELD: &str = "apiVersion";

/// Checks templates against the API versions a cluster serves
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Produce one entry per template that declares an apiVersion
    ///
    /// Templates without one are omitted. A malformed apiVersion line in
    /// any template fails the whole batch.
    pub fn analyze(
        &self,
        templates: &[Template],
        supported_api_versions: &[String],
    ) -> Result<CompatibilityReport> {
        let mut report = Vec::new();

        for template in templates {
            let Some(api_version) = extract_api_version(template)? else {
                continue;
            };

            let compatible = supported_api_versions.iter().any(|v| *v == api_version);
            report.push(CompatibilityEntry {
                template: template.clone(),
                compatible,
            });
        }

        Ok(report)
    }
}

/// Find the literal apiVersion a template declares
///
/// Lines that mention the field only in a comment or a value are skipped.
/// A line keyed by the field whose value is not a scalar (a template
/// expression such as `{{ include ... }}`) is a parse error.
pub fn extract_api_version(template: &Template) -> Result<Option<String>> {
    for line in template.content.lines() {
        if !line.contains(API_VERSION_FIELD) {
            continue;
        }

        let parsed: YamlValue =
            serde_yaml::from_str(line).map_err(|e| CoreError::TemplateParse {
                template: template.name.clone(),
                message: e.to_string(),
            })?;

        let Some(value) = parsed.as_mapping().and_then(|m| m.get(API_VERSION_FIELD)) else {
            continue;
        };

        match value {
            YamlValue::String(version) => return Ok(Some(version.clone())),
            YamlValue::Number(n) => return Ok(Some(n.to_string())),
            YamlValue::Bool(b) => return Ok(Some(b.to_string())),
            YamlValue::Null => continue,
            // `{{ ... }}` reads as a flow mapping
            other => {
                return Err(CoreError::TemplateParse {
                    template: template.name.clone(),
                    message: format!(
                        "{} must be a string, found {}",
                        API_VERSION_FIELD,
                        yaml_kind(other)
                    ),
                });
            }
        }
    }

    Ok(None)
}

fn yaml_kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Tagged(_) => "a tagged value",
        _ => "a scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> Vec<String> {
        vec!["v1".to_string(), "apps/v1".to_string()]
    }

    #[test]
    fn test_extract_api_version() {
        let t = Template::new(
            "templates/deployment.yaml",
            "{{- if .Values.enabled }}\napiVersion: apps/v1\nkind: Deployment\n{{- end }}",
        );
        assert_eq!(extract_api_version(&t).unwrap(), Some("apps/v1".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        let t = Template::new(
            "templates/list.yaml",
            "apiVersion: v1\nkind: List\nitems:\n  - apiVersion: apps/v1\n",
        );
        assert_eq!(extract_api_version(&t).unwrap(), Some("v1".to_string()));
    }

    #[test]
    fn test_comment_mentioning_field_is_skipped() {
        let t = Template::new(
            "templates/cm.yaml",
            "# apiVersion is set below\napiVersion: v1\nkind: ConfigMap",
        );
        assert_eq!(extract_api_version(&t).unwrap(), Some("v1".to_string()));
    }

    #[test]
    fn test_analyze_flags_unsupported() {
        let templates = vec![
            Template::new("templates/deployment.yaml", "apiVersion: apps/v1\nkind: Deployment"),
            Template::new("templates/ingress.yaml", "apiVersion: extensions/v1beta1\nkind: Ingress"),
        ];

        let report = Analyzer::new().analyze(&templates, &supported()).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report[0].compatible);
        assert!(!report[1].compatible);
        assert_eq!(report[1].template.name, "templates/ingress.yaml");
    }

    #[test]
    fn test_templates_without_api_version_are_omitted() {
        let templates = vec![
            Template::new("templates/_helpers.tpl", "{{- define \"app.name\" -}}app{{- end }}"),
            Template::new("templates/NOTES.txt", "Thanks for installing"),
        ];

        let report = Analyzer::new().analyze(&templates, &[]).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_malformed_line_fails_batch() {
        let templates = vec![
            Template::new("templates/ok.yaml", "apiVersion: v1\nkind: Service"),
            Template::new(
                "templates/bad.yaml",
                "apiVersion: {{ include \"app.apiVersion\" . }}\nkind: Deployment",
            ),
        ];

        let err = Analyzer::new().analyze(&templates, &supported()).unwrap_err();
        match err {
            CoreError::TemplateParse { template, .. } => assert_eq!(template, "templates/bad.yaml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_templated_api_version_is_error() {
        for line in [
            "apiVersion: {{ include \"app.apiVersion\" . }}",
            "apiVersion: {{ .Values.apiVersion }}",
            "apiVersion: [v1]",
        ] {
            let t = Template::new("templates/bad.yaml", line);
            let err = extract_api_version(&t).unwrap_err();
            assert!(
                matches!(err, CoreError::TemplateParse { ref template, .. } if template == "templates/bad.yaml"),
                "{line}: {err}"
            );
        }
    }

    #[test]
    fn test_field_in_value_is_skipped() {
        let t = Template::new(
            "templates/cm.yaml",
            "data:\n  note: \"set apiVersion later\"\napiVersion: v1\n",
        );
        assert_eq!(extract_api_version(&t).unwrap(), Some("v1".to_string()));
    }

    #[test]
    fn test_exact_string_match() {
        let templates = vec![Template::new("templates/a.yaml", "apiVersion: apps/v1beta2")];
        let report = Analyzer::new().analyze(&templates, &supported()).unwrap();
        assert!(!report[0].compatible);
    }
}
