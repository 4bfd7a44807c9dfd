pub mod handlers;
pub mod types;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::AnalysisPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
}

pub fn router(pipeline: Arc<AnalysisPipeline>) -> Router {
    let state = Arc::new(AppState { pipeline });

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/analyze/{address}", get(handlers::analyze_address))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(pipeline: Arc<AnalysisPipeline>, host: &str, port: u16) -> eyre::Result<()> {
    let app = router(pipeline);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
