//! Prometheus metrics for HTTP traffic and plan generation.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use crate::{error::ApiError, state::ApiState};

/// Install the Prometheus recorder and return a handle to render it.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full("study_plan_blocks".to_string()),
            &[10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count and latency per route.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    // Route templates keep label cardinality bounded
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Record one generated plan.
pub fn record_plan_generated(feasible: bool, blocks: usize, duration_secs: f64) {
    let feasible = if feasible { "true" } else { "false" };

    counter!("study_plans_generated_total", "feasible" => feasible).increment(1);
    histogram!("study_plan_blocks").record(blocks as f64);
    histogram!("study_plan_generation_seconds").record(duration_secs);
}

/// Handler for the `/metrics` endpoint.
pub async fn metrics_handler(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    state
        .metrics_handle
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))
}
