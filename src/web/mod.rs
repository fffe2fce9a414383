//! Web server module

mod client;
mod error;
mod routes;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{Config, GaConfig};
use crate::db::Database;

pub struct AppState {
    pub db: Database,
    pub ga: GaConfig,
    pub allowed_origin: String,
}

/// Build the application router. Cross-origin access is restricted to the
/// single allow-listed origin, GET only.
pub fn router(state: Arc<AppState>) -> Result<Router> {
    let origin = state.allowed_origin.parse::<HeaderValue>()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .route("/track-view", get(routes::track_view))
        .route("/get-total-views", get(routes::total_views))
        .route("/get-ga-config", get(routes::ga_config))
        .layer(cors)
        .with_state(state))
}

pub async fn start_server(config: &Config, db: Database) -> Result<()> {
    let state = Arc::new(AppState {
        db,
        ga: config.ga.clone(),
        allowed_origin: config.cors.allowed_origin.clone(),
    });

    let app = router(state)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
