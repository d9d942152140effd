use prep_api::{
    ApiConfig, ApiState,
    metrics::init_metrics,
    middleware::cors::create_cors_layer,
    router::router,
    tracing::init_tracing,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(&config.environment);

    let metrics_handle = if config.metrics_enabled {
        let handle = init_metrics()?;
        tracing::info!("Prometheus metrics exporter initialized");
        Some(handle)
    } else {
        None
    };

    let state = ApiState::new(&config, metrics_handle);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let app = router()
        .with_state(state)
        .layer(create_cors_layer(&config.allowed_origins))
        .layer(trace_layer);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        %address,
        environment = ?config.environment,
        max_plan_weeks = config.max_plan_weeks,
        "Study planner listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
