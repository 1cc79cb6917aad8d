use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use metro_server::config::ServerConfig;
use metro_server::feed::{FeedSource, MetroClient, MetroClientConfig, MockMetroClient};
use metro_server::refresh::Refresher;
use metro_server::store::SnapshotStore;
use metro_server::web::{AppState, create_router};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

fn feed_source(config: &ServerConfig) -> Result<FeedSource, String> {
    match &config.mock_feed {
        Some(path) => {
            let client = MockMetroClient::new(path).map_err(|e| e.to_string())?;
            info!(path = %path.display(), "using mock feed");
            Ok(FeedSource::Mock(client))
        }
        None => {
            let client_config = MetroClientConfig::new().with_url(&config.feed_url);
            let client = MetroClient::new(client_config).map_err(|e| e.to_string())?;
            info!(url = %config.feed_url, "using metro API");
            Ok(FeedSource::Remote(client))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match feed_source(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to create feed client: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Serve the last cached data until the first refresh lands
    let store = SnapshotStore::new(&config.cache_path);
    if store.load().await {
        info!(path = %config.cache_path.display(), "serving cached data");
    }

    let refresher = Arc::new(Refresher::new(vec![source.clone()], store.clone()));
    if let Err(e) = refresher.refresh().await {
        warn!("initial refresh failed: {e}");
    }

    // Spawn background task to refresh the data
    let interval_refresher = refresher.clone();
    let refresh_interval = config.refresh_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if let Err(e) = interval_refresher.refresh().await {
                warn!("refresh failed: {e}");
            }
        }
    });

    let state = AppState::new(store, Some(source), config.rate_limit);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Metro schedule server listening on http://{addr}");

    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, service).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
