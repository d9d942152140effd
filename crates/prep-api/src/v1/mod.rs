use axum::Router;

use crate::{plan, state::ApiState};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new().merge(plan::routes())
}
