//! Route handlers
//!
//! Thin adapters: extract the coordinates, call the service, encode JSON.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chartview_core::{Chart, ChartCoordinate, ChartValues, RenderResult, Repository, Template};
use chartview_service::ChartService;
use serde::Deserialize;

use super::error::ApiError;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(rename = "kube-version")]
    kube_version: Option<String>,
}

/// Body of a render request
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    /// Override values as YAML text
    #[serde(default)]
    values: String,
}

fn coordinate((repo, chart, version): (String, String, String)) -> ChartCoordinate {
    ChartCoordinate::new(repo, chart, version)
}

/// `GET /repos`
pub async fn list_repositories(
    State(service): State<ChartService>,
) -> ApiResult<Json<Vec<Repository>>> {
    let repos = service
        .list_repositories()
        .await
        .map_err(|e| ApiError::service("Cannot get repos", e))?;
    Ok(Json(repos))
}

/// `GET /charts/{repo}`
pub async fn list_charts(
    State(service): State<ChartService>,
    Path(repo): Path<String>,
) -> ApiResult<Json<Vec<Chart>>> {
    let charts = service
        .list_charts(&repo)
        .await
        .map_err(|e| ApiError::service(format!("Cannot get charts from repos {}", repo), e))?;
    Ok(Json(charts))
}

/// `GET /charts/{repo}/{chart}/{version}`
pub async fn chart(
    State(service): State<ChartService>,
    Path(path): Path<(String, String, String)>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Response> {
    let chart = coordinate(path);
    let context = || format!("Cannot get chart {}", chart);

    let response = match query.kube_version.filter(|v| !v.is_empty()) {
        Some(kube_version) => Json(
            service
                .analyze(&chart, &kube_version)
                .await
                .map_err(|e| ApiError::service(context(), e))?,
        )
        .into_response(),
        None => Json(
            service
                .chart(&chart)
                .await
                .map_err(|e| ApiError::service(context(), e))?,
        )
        .into_response(),
    };
    Ok(response)
}

/// `GET /charts/values/{repo}/{chart}/{version}`
pub async fn values(
    State(service): State<ChartService>,
    Path(path): Path<(String, String, String)>,
) -> ApiResult<Json<ChartValues>> {
    let chart = coordinate(path);
    let values = service
        .values(&chart)
        .await
        .map_err(|e| ApiError::service(format!("Cannot get values of {}", chart), e))?;
    Ok(Json(values))
}

/// `GET /charts/templates/{repo}/{chart}/{version}`
pub async fn templates(
    State(service): State<ChartService>,
    Path(path): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<Template>>> {
    let chart = coordinate(path);
    let templates = service
        .templates(&chart)
        .await
        .map_err(|e| ApiError::service(format!("Cannot get templates of {}", chart), e))?;
    Ok(Json(templates))
}

/// `POST /charts/manifests/render/{repo}/{chart}/{version}`
///
/// An empty body renders with no overrides.
pub async fn render(
    State(service): State<ChartService>,
    Path(path): Path<(String, String, String)>,
    body: Bytes,
) -> ApiResult<Json<RenderResult>> {
    let chart = coordinate(path);
    let request: RenderRequest = if body.is_empty() {
        RenderRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::invalid_body(format!("Error rendering manifest: invalid body: {}", e))
        })?
    };

    let result = service
        .render(&chart, request.values.as_bytes())
        .await
        .map_err(|e| ApiError::service("Error rendering manifest", e))?;
    Ok(Json(result))
}

/// `GET /charts/manifests/{repo}/{chart}/{version}/{hash}`
///
/// Plain text; empty when nothing was rendered under `hash`.
pub async fn stringified(
    State(service): State<ChartService>,
    Path((repo, chart, version, hash)): Path<(String, String, String, String)>,
) -> ApiResult<Response> {
    let chart = ChartCoordinate::new(repo, chart, version);
    let text = service
        .stringified(&chart, &hash)
        .await
        .map_err(|e| ApiError::service(format!("Cannot get manifests of {}", chart), e))?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response())
}
