use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::{
    config::DashboardConfig,
    model::Job,
    patterns,
    server::AppState,
};

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobView {
    #[serde(flatten)]
    job: Job,
    display_name: String,
}

/// Current job list, served through the refresh cache. A total discovery
/// failure becomes a 503 with an error body, so the UI can tell "discovery
/// is down" apart from "no jobs exist".
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Response {
    let locator = state.locator.clone();
    let result = state
        .jobs_cache
        .get_or_refresh(|| async move { locator.locate_jobs().await })
        .await;

    match result {
        Ok(jobs) => {
            let views: Vec<JobView> = jobs
                .into_iter()
                .map(|job| JobView {
                    display_name: patterns::render(&state.config.patterns.display_name, &job),
                    job,
                })
                .collect();
            Json(views).into_response()
        }
        Err(e) => {
            error!("job discovery failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<DashboardConfig> {
    Json(state.config.dashboard_config())
}

pub async fn metrics() -> String {
    crate::metrics::gather_metrics()
}
