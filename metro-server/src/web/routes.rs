//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::schedule::SubwayData;

use super::dto::*;
use super::limit::rate_limit;
use super::state::AppState;

/// Message returned while no data has been loaded yet.
const NOT_READY: &str = "Try again later";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/data/all", get(all_data))
        .route("/data/holidays", get(holidays))
        .route("/data/lines", get(lines))
        .route("/data/stations", get(stations))
        .route("/data/today", get(today))
        .route("/data/original", get(original))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The data being served, or an error if nothing is loaded yet.
async fn loaded(state: &AppState) -> Result<Arc<SubwayData>, AppError> {
    state.store.get().await.ok_or_else(|| AppError::Internal {
        message: NOT_READY.to_string(),
    })
}

async fn all_data(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = loaded(&state).await?;
    Ok(Json(&*data).into_response())
}

async fn holidays(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = loaded(&state).await?;
    Ok(Json(&data.events).into_response())
}

async fn lines(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = loaded(&state).await?;
    Ok(Json(&data.lines).into_response())
}

async fn stations(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = loaded(&state).await?;
    Ok(Json(&data.stations).into_response())
}

#[derive(Debug, Deserialize)]
struct TodayRequest {
    /// Day to look up as YYYY-MM-DD (defaults to the local date)
    date: Option<String>,
}

/// The segments in effect on one day, with their regime.
async fn today(
    State(state): State<AppState>,
    Query(req): Query<TodayRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let date = match req.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date: {s}"),
        })?,
        None => Local::now().date_naive(),
    };

    let data = loaded(&state).await?;
    let regime = data.regime_on(date);
    let segments = data
        .line()
        .map(|line| line.schedules.get(regime).to_vec())
        .unwrap_or_default();

    Ok(Json(TodayResponse {
        date,
        regime,
        segments,
    }))
}

/// The upstream feed exactly as the upstream app receives it.
async fn original(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let source = state.source.as_ref().ok_or_else(|| AppError::NotFound {
        message: "No upstream feed configured".to_string(),
    })?;

    let raw = source.fetch_raw().await.map_err(|e| AppError::BadGateway {
        message: e.to_string(),
    })?;

    Ok(Json(raw))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
