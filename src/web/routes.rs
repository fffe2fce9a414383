//! HTTP route handlers

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, info};

use super::client;
use super::error::AppError;
use super::AppState;
use crate::db::{today_local, ViewEvent};

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TotalViewsResponse {
    pub total_views: i64,
}

#[derive(Debug, Serialize)]
pub struct GaConfigResponse {
    pub measurement_id: Option<String>,
    pub api_secret: Option<String>,
}

/// Record one view for today. A duplicate (ip, user-agent, day) triple is
/// dropped by the storage layer and still answers success.
pub async fn track_view(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<TrackResponse>, AppError> {
    let ip = client::real_ip(&headers, &addr.ip().to_string());
    let user_agent = client::user_agent(&headers);

    let event = ViewEvent::new(ip, user_agent);
    let stored = state.db.record_view(&event).await?;
    if stored {
        info!("View recorded from {} ({})", event.ip, event.user_agent);
    } else {
        debug!("Duplicate view from {} ignored", event.ip);
    }

    Ok(Json(TrackResponse { status: "success" }))
}

/// Count of views recorded today
pub async fn total_views(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TotalViewsResponse>, AppError> {
    let total_views = state.db.count_views_on(&today_local()).await?;
    Ok(Json(TotalViewsResponse { total_views }))
}

/// Analytics configuration, gated on an exact Origin match. Fails closed
/// with an empty 403 for any other caller.
pub async fn ga_config(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    if origin != Some(state.allowed_origin.as_str()) {
        return StatusCode::FORBIDDEN.into_response();
    }

    Json(GaConfigResponse {
        measurement_id: state.ga.measurement_id.clone(),
        api_secret: state.ga.api_secret.clone(),
    })
    .into_response()
}
