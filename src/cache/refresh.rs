//! Cache Refresh Scheduler
//!
//! Keeps the `MessageCache` in step with the remote source for the lifetime of the process.
//!
//! ## Cycle
//! 1. **Decide**: a full refresh is due once `full_refresh_interval` has passed since the
//!    last one; otherwise the cycle is incremental.
//! 2. **Refresh**: fetch and publish into the cache.
//! 3. **Sleep**: wait `incremental_interval`, or stop if cancelled.
//!
//! A failed fetch leaves the cache as it was (stale beats empty). A cycle that panics is
//! logged and the loop carries on after the usual sleep; there is no other retry logic.

use super::store::MessageCache;
use crate::source::client::MessageSource;

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Timing and batch sizes for the refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Minimum time between two full reloads.
    pub full_refresh_interval: Duration,
    /// Pause after every cycle.
    pub incremental_interval: Duration,
    /// Page size for full reloads; large enough to pull the whole listing at once.
    pub full_fetch_limit: usize,
    /// Page size for incremental top-ups.
    pub incremental_fetch_limit: usize,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            full_refresh_interval: Duration::from_secs(6 * 60 * 60),
            incremental_interval: Duration::from_secs(15),
            full_fetch_limit: 10_000,
            incremental_fetch_limit: 200,
        }
    }
}

/// What a single refresh did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Full refresh swapped in a new message set.
    Replaced { loaded: usize, total: usize },
    /// Incremental refresh added messages to the tail.
    Appended { added: usize, cached: usize },
    /// Incremental refresh skipped because every reported message is already cached.
    AlreadyComplete,
    /// The source returned nothing; the cache was left alone.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleKind {
    Full,
    Incremental,
}

pub struct RefreshScheduler<S> {
    cache: Arc<MessageCache>,
    source: Arc<S>,
    settings: RefreshSettings,
}

impl<S> RefreshScheduler<S>
where
    S: MessageSource + 'static,
{
    pub fn new(cache: Arc<MessageCache>, source: Arc<S>, settings: RefreshSettings) -> Arc<Self> {
        Arc::new(Self {
            cache,
            source,
            settings,
        })
    }

    /// Reloads everything from offset zero.
    pub async fn full_refresh(&self) -> RefreshOutcome {
        tracing::info!("[Cache] Performing full refresh...");

        let page = self.source.fetch(0, self.settings.full_fetch_limit).await;
        if page.is_empty() {
            tracing::warn!("[Cache] Full refresh returned no messages, keeping current cache");
            return RefreshOutcome::Unchanged;
        }

        let loaded = page.items.len();
        if page.skipped > 0 {
            tracing::warn!("[Cache] Full refresh dropped {} undecodable messages", page.skipped);
        }
        let total = self.cache.replace_page(page).await;

        tracing::info!(
            "[Cache] Full refresh loaded {} messages. Total available: {}",
            loaded,
            total
        );
        RefreshOutcome::Replaced { loaded, total }
    }

    /// Fetches the next batch past what is already cached.
    pub async fn incremental_refresh(&self) -> RefreshOutcome {
        let snapshot = self.cache.snapshot().await;
        if snapshot.is_complete() {
            tracing::debug!(
                "[Cache] All messages loaded ({} / {}), skipping incremental refresh",
                snapshot.source_offset,
                snapshot.total_messages
            );
            return RefreshOutcome::AlreadyComplete;
        }

        let offset = snapshot.source_offset;
        drop(snapshot);

        let page = self
            .source
            .fetch(offset, self.settings.incremental_fetch_limit)
            .await;
        if page.consumed() == 0 {
            tracing::debug!("[Cache] No new messages");
            return RefreshOutcome::Unchanged;
        }

        let added = page.items.len();
        // Undecodable records still advance the offset so they are not fetched again.
        let cached = self.cache.append_page(page).await;
        tracing::info!("[Cache] Incremental refresh: +{} messages ({} cached)", added, cached);

        RefreshOutcome::Appended { added, cached }
    }

    /// Runs refresh cycles until `cancel` fires.
    ///
    /// Cancellation is observed between cycles, so a cycle already in progress finishes its
    /// cache mutation before the loop exits.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        tracing::info!(
            "Refresh loop started (incremental every {:?}, full every {:?})",
            self.settings.incremental_interval,
            self.settings.full_refresh_interval
        );

        let mut last_full_refresh = Instant::now();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let now = Instant::now();
            let kind = if now.duration_since(last_full_refresh) > self.settings.full_refresh_interval
            {
                last_full_refresh = now;
                CycleKind::Full
            } else {
                CycleKind::Incremental
            };

            match AssertUnwindSafe(self.run_cycle(kind)).catch_unwind().await {
                Ok(outcome) => {
                    tracing::trace!("[Cache] {:?} cycle finished: {:?}", kind, outcome);
                }
                Err(panic) => {
                    tracing::error!(
                        "[Cache] Error in refresh task ({:?} cycle): {}",
                        kind,
                        panic_message(&*panic)
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.incremental_interval) => {}
            }
        }

        tracing::info!("[Cache] Refresh task cancelled");
    }

    /// Spawns `run` on the Tokio runtime.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(cancel).await;
        })
    }

    async fn run_cycle(&self, kind: CycleKind) -> RefreshOutcome {
        match kind {
            CycleKind::Full => self.full_refresh().await,
            CycleKind::Incremental => self.incremental_refresh().await,
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
