//! Metro feed retrieval.
//!
//! The upstream metro API publishes every station with four raw timetable
//! strings (workday/holiday × previous/next neighbour) plus a list of public
//! holidays, all in a single JSON document. This module fetches that
//! document and converts it into a [`FeedSnapshot`] for the schedule
//! pipeline. Schedule strings are not parsed here.

mod client;
mod convert;
mod error;
mod mock;
mod types;

use std::future::Future;

pub use client::{DEFAULT_FEED_URL, MetroClient, MetroClientConfig};
pub use convert::{convert_holiday, convert_response, convert_station};
pub use error::FeedError;
pub use mock::MockMetroClient;
pub use types::{MetroHoliday, MetroInfo, MetroResponse, MetroStation};

use crate::schedule::FeedSnapshot;

/// A source of feed snapshots.
///
/// This abstraction lets the refresher try several sources in order and be
/// tested with canned data.
pub trait FeedProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch one snapshot of the feed.
    fn fetch(&self) -> impl Future<Output = Result<FeedSnapshot, FeedError>> + Send;
}

/// The feed sources the server can be configured with.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Remote(MetroClient),
    Mock(MockMetroClient),
}

impl FeedSource {
    /// Fetch the untouched upstream JSON.
    pub async fn fetch_raw(&self) -> Result<serde_json::Value, FeedError> {
        match self {
            FeedSource::Remote(client) => client.fetch_raw().await,
            FeedSource::Mock(client) => client.fetch_raw(),
        }
    }
}

impl FeedProvider for FeedSource {
    fn name(&self) -> &str {
        match self {
            FeedSource::Remote(client) => client.name(),
            FeedSource::Mock(client) => client.name(),
        }
    }

    async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        match self {
            FeedSource::Remote(client) => client.fetch().await,
            FeedSource::Mock(client) => client.load(),
        }
    }
}
