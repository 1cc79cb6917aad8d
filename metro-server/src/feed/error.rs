//! Feed error types.

/// Errors that can occur when fetching or converting the metro feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized by metro API")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by metro API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A record parsed as JSON but violates the data model
    #[error("invalid {record} record {id:?}: {message}")]
    InvalidRecord {
        record: &'static str,
        id: String,
        message: String,
    },

    /// Reading a local feed file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
