//! In-memory chart archive reading
//!
//! A chart archive is a gzipped tarball whose entries all live under one
//! top-level directory named after the chart:
//!
//! ```text
//! app-deploy/Chart.yaml
//! app-deploy/values.yaml
//! app-deploy/templates/deployment.yaml
//! app-deploy/charts/<subchart>/...
//! ```

use std::io::{Cursor, Read};
use std::path::{Component, Path};

use chartview_core::{ChartValues, Template};
use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{RepoError, Result};

const CHART_FILE: &str = "Chart.yaml";
const VALUES_FILE: &str = "values.yaml";
const TEMPLATES_DIR: &str = "templates";

/// The parts of a chart the catalog serves
#[derive(Debug, Clone, Default)]
pub struct ChartArchive {
    /// Top-level directory of the archive
    pub name: String,

    /// Raw `values.yaml`, empty when the chart ships none
    pub values_yaml: String,

    /// Files under `templates/`, sorted by name
    pub templates: Vec<Template>,
}

impl ChartArchive {
    /// Read a `.tgz` chart archive
    ///
    /// Only the top-level chart is read; subcharts under `charts/` are
    /// skipped.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = Archive::new(GzDecoder::new(Cursor::new(data)));
        let mut chart = ChartArchive::default();
        let mut root: Option<String> = None;
        let mut has_chart_file = false;

        for entry in archive.entries().map_err(invalid)? {
            let mut entry = entry.map_err(invalid)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = entry.path().map_err(invalid)?.into_owned();
            let Some((top, relative)) = split_root(&path) else {
                continue;
            };

            match &root {
                Some(existing) if *existing != top => continue,
                Some(_) => {}
                None => root = Some(top),
            }

            if relative == CHART_FILE {
                has_chart_file = true;
            } else if relative == VALUES_FILE {
                chart.values_yaml = read_text(&mut entry, &relative)?;
            } else if relative.starts_with(&format!("{}/", TEMPLATES_DIR)) {
                let content = read_text(&mut entry, &relative)?;
                chart.templates.push(Template::new(relative, content));
            }
        }

        let Some(name) = root else {
            return Err(RepoError::InvalidArchive {
                message: "archive is empty".to_string(),
            });
        };
        if !has_chart_file {
            return Err(RepoError::InvalidArchive {
                message: format!("{} has no {}", name, CHART_FILE),
            });
        }

        chart.name = name;
        chart.templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(chart)
    }

    /// Parse the declared values
    pub fn values(&self) -> Result<ChartValues> {
        Ok(ChartValues::from_yaml(&self.values_yaml)?)
    }
}

/// Split `chart/rest/of/path` into the chart directory and the rest
fn split_root(path: &Path) -> Option<(String, String)> {
    let mut parts = path.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    });

    let top = parts.next()?;
    let relative = parts.collect::<Vec<_>>().join("/");
    if relative.is_empty() {
        None
    } else {
        Some((top, relative))
    }
}

fn read_text<R: Read>(reader: &mut R, name: &str) -> Result<String> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| RepoError::InvalidArchive {
            message: format!("{}: {}", name, e),
        })?;
    Ok(content)
}

fn invalid(e: std::io::Error) -> RepoError {
    RepoError::InvalidArchive {
        message: e.to_string(),
    }
}
