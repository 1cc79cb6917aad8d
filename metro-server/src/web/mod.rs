//! HTTP API serving the subway data.

mod dto;
mod limit;
mod routes;
mod state;

pub use dto::*;
pub use limit::RateLimiter;
pub use routes::{AppError, create_router};
pub use state::AppState;
