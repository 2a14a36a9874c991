//! Search Service Module
//!
//! Answers ranked, paginated queries against the in-memory message cache.
//!
//! ## Overview
//! Every cached message is scored against the query with a handful of additive signals
//! (exact match, substring, small edit distance) on the user name and the message body.
//! Irrelevant messages are dropped, the rest are sorted by score, and a page is cut out.
//! A tiny timestamp-derived fraction is folded into each score so that equally relevant
//! messages come out newest first.
//!
//! Searching only reads a cache snapshot; it never waits on a refresh in progress.
//!
//! ## Submodules
//! - **`engine`**: Ranking and pagination over a snapshot, and the async entry point.
//! - **`scoring`**: The relevance signals, recency nudge, and bounded edit distance.
//! - **`error`**: The caller-visible error type.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: Data Transfer Objects (DTOs) for API communication.

pub mod engine;
pub mod error;
pub mod handlers;
pub mod scoring;
pub mod types;
