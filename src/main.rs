use message_search::cache::refresh::RefreshScheduler;
use message_search::cache::store::MessageCache;
use message_search::config::{APP_VERSION, Settings};
use message_search::logging;
use message_search::server::{AppInfo, build_router};
use message_search::source::client::HttpMessageSource;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    // Flushes the log file on drop; keep it alive until exit.
    let _log_guard = logging::init(settings.log_level, settings.log_file())?;

    tracing::info!("Starting {} v{}", settings.app_name, APP_VERSION);
    tracing::info!("Environment: {}", settings.environment);
    tracing::info!("Debug mode: {}", settings.is_debug());
    if let Some(path) = settings.log_file() {
        tracing::info!("Logging to {} (rotated daily)", path.display());
    }

    // 1. Cache + remote source:
    let cache = Arc::new(MessageCache::new());
    let source = Arc::new(HttpMessageSource::new(
        settings.full_api_url(),
        settings.fetch_timeout(),
    )?);
    tracing::info!("Message source: {}", source.url());

    let scheduler = RefreshScheduler::new(cache.clone(), source, settings.refresh_settings());

    // 2. Initial load (an empty cache is acceptable if the source is down):
    tracing::info!("[Startup] Loading all messages into cache...");
    scheduler.full_refresh().await;

    // 3. Background refresh:
    tracing::info!("[Startup] Starting background refresh task...");
    let cancel = CancellationToken::new();
    let refresh_handle = scheduler.spawn(cancel.clone());

    // 4. HTTP Router:
    let app = build_router(
        cache,
        AppInfo {
            name: settings.app_name.clone(),
            version: APP_VERSION.to_string(),
        },
    );

    // 5. Start HTTP server:
    let bind_addr = settings.bind_addr()?;
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[Shutdown] Stopping refresh task...");
    cancel.cancel();
    if let Err(e) = refresh_handle.await {
        tracing::warn!("Refresh task ended abnormally: {}", e);
    }
    tracing::info!("Shutting down {}", settings.app_name);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
