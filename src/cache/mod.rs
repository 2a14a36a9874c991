//! Message Cache Module
//!
//! The in-memory copy of the remote message listing and the background task that keeps it fresh.
//!
//! ## Core Concepts
//! - **Snapshot**: Readers work on an immutable `Arc<CacheSnapshot>`; mutations publish a new one.
//! - **Full refresh**: Replaces the whole set from offset zero on a long interval.
//! - **Incremental refresh**: Appends the next batch past the cached range on a short interval,
//!   until the cached count reaches the total the source reported.
//! - **Staleness**: A failed fetch never empties the cache; the previous set keeps serving queries.
//!
//! ## Submodules
//! - **`store`**: `MessageCache`, the shared snapshot holder with its replace/append mutations.
//! - **`refresh`**: `RefreshScheduler`, the cancellable refresh loop.

pub mod refresh;
pub mod store;
