//! Application state for the web layer.

use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::feed::FeedSource;
use crate::store::SnapshotStore;

use super::limit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Data being served
    pub store: SnapshotStore,

    /// Upstream feed for `/data/original`, if one is configured
    pub source: Option<Arc<FeedSource>>,

    /// Per-client request limit
    pub limiter: RateLimiter,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: SnapshotStore, source: Option<FeedSource>, rate_limit: RateLimitConfig) -> Self {
        Self {
            store,
            source: source.map(Arc::new),
            limiter: RateLimiter::new(rate_limit),
        }
    }
}
