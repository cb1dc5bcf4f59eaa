pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health::{self, HealthState},
    video::{VideoController, DOWNLOAD_PATH},
};
use crate::infrastructure::config::Config;
use request_id::request_id_middleware;

/// Assemble every route with its state and the shared layers
pub fn build_router(
    config: &Config,
    health_state: Arc<HealthState>,
    video_controller: Arc<VideoController>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state);

    // Video routes; the body limit covers the uploaded face image
    let video_routes = Router::new()
        .route("/api/videos", post(VideoController::generate))
        .route(DOWNLOAD_PATH, get(VideoController::download))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(video_controller);

    let app = Router::new()
        .merge(health_routes)
        .merge(video_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        );

    if config.is_development() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
