//! Remote Source Module
//!
//! Pulls pages of messages from the external messages API.
//!
//! ## Contract
//! The client never surfaces an error past its boundary. A timeout, a connection failure,
//! a non-success status or a malformed payload is logged and reported as an empty page, so
//! callers must read "no items" as "unknown right now", never as "there is nothing".
//!
//! ## Submodules
//! - **`client`**: The `MessageSource` trait and its `reqwest`-backed implementation.
//! - **`types`**: The `Message` record and the wire payload wrapping a page of them.

pub mod client;
pub mod types;
