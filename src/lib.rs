//! Message Search Service Library
//!
//! Keeps an in-memory copy of a remote message listing and serves ranked full-text search over it.
//! The binary (`main.rs`) wires these modules into an HTTP service.
//!
//! ## Modules
//! - **`source`**: Client for the remote messages API. Failures degrade to empty pages
//!   instead of errors.
//! - **`cache`**: The shared message cache and the background scheduler that refreshes it
//!   with periodic full reloads and frequent incremental top-ups.
//! - **`search`**: Relevance scoring, ranking, pagination, and the search HTTP handler.
//! - **`config`**: Environment-driven settings.
//! - **`logging`**: Console plus rotating file output for `tracing`.
//! - **`server`**: Router assembly and the service info/health endpoints.

pub mod cache;
pub mod config;
pub mod logging;
pub mod search;
pub mod server;
pub mod source;

#[cfg(test)]
mod test_support;
