//! In-Memory Message Store
//!
//! Holds the process-wide message set behind a copy-on-write snapshot.
//!
//! Readers take a cheap `Arc` clone of the current snapshot and never hold the lock while
//! they work. Writers publish a whole new snapshot, so a reader sees either the state
//! before a mutation or the state after it, never something in between.

use crate::source::types::{Message, MessagePage};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An immutable view of the cache at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    /// Messages in fetch order.
    pub messages: Vec<Message>,
    /// When the last full refresh landed.
    pub last_updated: Option<DateTime<Utc>>,
    /// High-water mark: the newest timestamp among `messages`.
    pub latest_timestamp: Option<DateTime<Utc>>,
    /// Population reported by the remote source. May exceed `messages.len()`.
    pub total_messages: usize,
    /// Remote records consumed so far, counting undecodable ones that were dropped.
    /// Incremental fetches resume from here.
    pub source_offset: usize,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True once every record the source reported has been consumed.
    pub fn is_complete(&self) -> bool {
        self.source_offset >= self.total_messages
    }
}

/// Summary figures exposed by the health endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStats {
    pub cached_messages: usize,
    pub total_messages: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// Shared, owned message cache.
///
/// Created empty; the refresh scheduler is the only writer.
#[derive(Debug, Default)]
pub struct MessageCache {
    current: RwLock<Arc<CacheSnapshot>>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot. The read lock is released before this returns.
    pub async fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.current.read().await.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        let snapshot = self.snapshot().await;
        CacheStats {
            cached_messages: snapshot.len(),
            total_messages: snapshot.total_messages,
            last_updated: snapshot.last_updated,
            latest_timestamp: snapshot.latest_timestamp,
        }
    }

    /// Swaps the whole message set.
    ///
    /// `reported_total` is the source's own count; without it the fetched count is used.
    pub async fn replace(&self, messages: Vec<Message>, reported_total: Option<usize>) {
        self.replace_page(MessagePage {
            items: messages,
            total: reported_total,
            skipped: 0,
        })
        .await;
    }

    /// Swaps in the contents of a page fetched from offset zero and returns the total it
    /// now reports.
    pub async fn replace_page(&self, page: MessagePage) -> usize {
        let source_offset = page.consumed();
        let total_messages = page.total.unwrap_or(source_offset);
        let next = CacheSnapshot {
            latest_timestamp: max_timestamp(&page.items),
            last_updated: Some(Utc::now()),
            total_messages,
            source_offset,
            messages: page.items,
        };

        *self.current.write().await = Arc::new(next);
        total_messages
    }

    /// Appends messages to the tail and returns the new cached count.
    ///
    /// The high-water mark only moves forward.
    pub async fn append(&self, messages: Vec<Message>) -> usize {
        self.append_page(MessagePage {
            items: messages,
            total: None,
            skipped: 0,
        })
        .await
    }

    /// Appends a page fetched at `source_offset` and moves the offset past every record
    /// it covered, including skipped ones. Returns the new cached count.
    pub async fn append_page(&self, page: MessagePage) -> usize {
        let mut guard = self.current.write().await;
        let consumed = page.consumed();
        if consumed == 0 {
            return guard.len();
        }

        let incoming_max = max_timestamp(&page.items);
        // Clones only if a reader still holds the previous snapshot.
        let snapshot = Arc::make_mut(&mut *guard);
        snapshot.messages.extend(page.items);
        snapshot.latest_timestamp = snapshot.latest_timestamp.max(incoming_max);
        snapshot.source_offset += consumed;
        snapshot.len()
    }
}

fn max_timestamp(messages: &[Message]) -> Option<DateTime<Utc>> {
    messages.iter().map(|m| m.timestamp).max()
}
