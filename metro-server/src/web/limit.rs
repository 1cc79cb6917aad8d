//! Per-client request limiting.
//!
//! Each client IP gets a counter that lives for one window from its first
//! request. Requests past the limit within that window are rejected with
//! `429 Too Many Requests`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::config::RateLimitConfig;

use super::dto::ErrorResponse;
use super::state::AppState;

/// Upper bound on tracked clients.
const MAX_CLIENTS: u64 = 100_000;

/// Fixed-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    counters: MokaCache<IpAddr, Arc<AtomicU32>>,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let counters = MokaCache::builder()
            .time_to_live(config.window)
            .max_capacity(MAX_CLIENTS)
            .build();

        Self {
            counters,
            max_requests: config.max_requests,
        }
    }

    /// Count a request from `ip`, returning whether it is allowed.
    pub async fn check(&self, ip: IpAddr) -> bool {
        let counter = self
            .counters
            .get_with(ip, async { Arc::new(AtomicU32::new(0)) })
            .await;

        let seen = counter.fetch_add(1, Ordering::Relaxed);
        seen < self.max_requests
    }
}

/// Middleware rejecting clients over their limit.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // Requests without connection info (e.g. in-process tests) share one bucket.
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !state.limiter.check(ip).await {
        debug!(%ip, "rate limit exceeded");
        let body = Json(ErrorResponse {
            error: "Too many requests, please try again later".to_string(),
        });
        return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    }

    next.run(request).await
}
