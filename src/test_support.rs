//! Shared fixtures for unit tests.

use crate::source::client::MessageSource;
use crate::source::types::{Message, MessagePage};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Builds a message stamped `epoch_secs` seconds after the Unix epoch.
pub fn message(id: &str, user_name: &str, text: &str, epoch_secs: i64) -> Message {
    Message {
        id: id.to_string(),
        user_id: format!("uid-{}", user_name.to_lowercase()),
        user_name: user_name.to_string(),
        timestamp: Utc.timestamp_opt(epoch_secs, 0).unwrap(),
        message: text.to_string(),
    }
}

pub fn page(items: Vec<Message>, total: Option<usize>) -> MessagePage {
    MessagePage {
        items,
        total,
        skipped: 0,
    }
}

/// Source that replays queued pages in order and records every request.
///
/// Once the queue is drained it behaves like an unreachable source.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<MessagePage>>,
    calls: Mutex<Vec<(usize, usize)>>,
    panic_on_call: Mutex<Option<usize>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<MessagePage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    /// Makes the `n`th request (zero-based) panic instead of answering.
    pub fn panicking_on(self, n: usize) -> Self {
        *self.panic_on_call.lock().unwrap() = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn fetch(&self, skip: usize, limit: usize) -> MessagePage {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((skip, limit));
            calls.len() - 1
        };

        if *self.panic_on_call.lock().unwrap() == Some(call_index) {
            panic!("scripted source failure on call {}", call_index);
        }

        self.pages.lock().unwrap().pop_front().unwrap_or_default()
    }
}
