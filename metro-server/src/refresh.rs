//! Periodic rebuild of the served subway data.
//!
//! A refresh asks each configured provider in turn for a feed snapshot,
//! builds [`SubwayData`](crate::schedule::SubwayData) from the first one
//! that succeeds, and hands it to the [`SnapshotStore`]. If every provider
//! fails, the store keeps serving whatever it had.

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::feed::{FeedError, FeedProvider};
use crate::schedule::{BuildError, build_subway_data};
use crate::store::SnapshotStore;

/// Why a single provider attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("fetch failed: {0}")]
    Feed(#[from] FeedError),

    #[error("build failed: {0}")]
    Build(#[from] BuildError),
}

/// Errors from a refresh pass.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("no feed providers configured")]
    NoProviders,

    #[error("all feed providers failed, last ({provider}): {source}")]
    AllFailed {
        provider: String,
        #[source]
        source: AttemptError,
    },
}

/// Summary of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Name of the provider whose snapshot was used.
    pub provider: String,
    /// Number of stations in the new data.
    pub stations: usize,
}

/// Rebuilds the store's data from a list of providers.
pub struct Refresher<P> {
    providers: Vec<P>,
    store: SnapshotStore,
    in_flight: Mutex<()>,
}

impl<P: FeedProvider> Refresher<P> {
    /// Create a refresher trying `providers` in order.
    pub fn new(providers: Vec<P>, store: SnapshotStore) -> Self {
        Self {
            providers,
            store,
            in_flight: Mutex::new(()),
        }
    }

    /// The store this refresher writes to.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run one refresh pass.
    ///
    /// Concurrent calls are serialized. A failure to write the cache file is
    /// logged but does not fail the pass, since the new data is already being
    /// served.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let _guard = self.in_flight.lock().await;

        let mut last = None;
        for provider in &self.providers {
            let name = provider.name().to_string();

            let attempt = async {
                let snapshot = provider.fetch().await?;
                Ok::<_, AttemptError>(build_subway_data(&snapshot)?)
            };

            match attempt.await {
                Ok(data) => {
                    let stations = data.stations.len();
                    if let Err(e) = self.store.save(data).await {
                        warn!(error = %e, "failed to write cache file");
                    }
                    info!(provider = %name, stations, "refreshed subway data");
                    return Ok(RefreshOutcome {
                        provider: name,
                        stations,
                    });
                }
                Err(e) => {
                    warn!(provider = %name, error = %e, "feed provider failed");
                    last = Some((name, e));
                }
            }
        }

        match last {
            Some((provider, source)) => Err(RefreshError::AllFailed { provider, source }),
            None => Err(RefreshError::NoProviders),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockMetroClient;
    use crate::schedule::FeedSnapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    const MOCK_FEED: &str = "data/mock_feed.json";

    /// Provider returning a fixed result and counting calls.
    struct FakeProvider {
        name: &'static str,
        result: fn() -> Result<FeedSnapshot, FeedError>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(name: &'static str, result: fn() -> Result<FeedSnapshot, FeedError>) -> Self {
            Self {
                name,
                result,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FeedProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    impl FeedProvider for &FakeProvider {
        fn name(&self) -> &str {
            <FakeProvider as FeedProvider>::name(self)
        }

        async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
            <FakeProvider as FeedProvider>::fetch(self).await
        }
    }

    fn good() -> Result<FeedSnapshot, FeedError> {
        MockMetroClient::new(MOCK_FEED)?.load()
    }

    fn unreachable() -> Result<FeedSnapshot, FeedError> {
        Err(FeedError::RateLimited)
    }

    fn unbuildable() -> Result<FeedSnapshot, FeedError> {
        let mut snapshot = good()?;
        let last = snapshot.stations.len() - 1;
        snapshot.stations[last].timetable.workday.prev = "4,nonsense".to_string();
        Ok(snapshot)
    }

    fn store_in(dir: &tempfile::TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path().join("data.json"))
    }

    #[tokio::test]
    async fn first_success_wins() {
        let dir = tempdir().unwrap();
        let primary = FakeProvider::new("primary", good);
        let backup = FakeProvider::new("backup", good);
        let refresher = Refresher::new(vec![&primary, &backup], store_in(&dir));

        let outcome = refresher.refresh().await.unwrap();

        assert_eq!(outcome.provider, "primary");
        assert_eq!(outcome.stations, 5);
        assert_eq!(primary.calls(), 1);
        assert_eq!(backup.calls(), 0);
        assert!(refresher.store().get().await.is_some());
        assert!(dir.path().join("data.json").exists());
    }

    #[tokio::test]
    async fn falls_back_after_fetch_failure() {
        let dir = tempdir().unwrap();
        let primary = FakeProvider::new("primary", unreachable);
        let backup = FakeProvider::new("backup", good);
        let refresher = Refresher::new(vec![&primary, &backup], store_in(&dir));

        let outcome = refresher.refresh().await.unwrap();

        assert_eq!(outcome.provider, "backup");
        assert_eq!(primary.calls(), 1);
        assert_eq!(backup.calls(), 1);
    }

    #[tokio::test]
    async fn falls_back_after_build_failure() {
        let dir = tempdir().unwrap();
        let primary = FakeProvider::new("primary", unbuildable);
        let backup = FakeProvider::new("backup", good);
        let refresher = Refresher::new(vec![&primary, &backup], store_in(&dir));

        assert_eq!(refresher.refresh().await.unwrap().provider, "backup");
    }

    #[tokio::test]
    async fn all_failed_reports_last_error_and_keeps_data() {
        let dir = tempdir().unwrap();
        let good_provider = FakeProvider::new("good", good);
        Refresher::new(vec![&good_provider], store_in(&dir))
            .refresh()
            .await
            .unwrap();

        let store = store_in(&dir);
        assert!(store.load().await);

        let first = FakeProvider::new("first", unreachable);
        let second = FakeProvider::new("second", unbuildable);
        let refresher = Refresher::new(vec![&first, &second], store);

        match refresher.refresh().await {
            Err(RefreshError::AllFailed { provider, source }) => {
                assert_eq!(provider, "second");
                assert!(matches!(source, AttemptError::Build(_)));
            }
            other => panic!("expected AllFailed, got {other:?}"),
        }
        assert!(refresher.store().get().await.is_some());
    }

    #[tokio::test]
    async fn no_providers() {
        let dir = tempdir().unwrap();
        let refresher: Refresher<&FakeProvider> = Refresher::new(Vec::new(), store_in(&dir));

        assert!(matches!(
            refresher.refresh().await,
            Err(RefreshError::NoProviders)
        ));
    }
}
