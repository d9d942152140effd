use axum::{Router, http::StatusCode, middleware, response::IntoResponse, routing::get};

use crate::{
    metrics::{metrics_handler, track_metrics},
    middleware::request_id::request_id_middleware,
    state::ApiState,
    v1,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .nest("/v1", v1::routes())
        .fallback(handler_404)
        .layer(middleware::from_fn(track_metrics))
        .layer(middleware::from_fn(request_id_middleware))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
