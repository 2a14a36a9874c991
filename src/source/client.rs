use super::types::MessagePage;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;

/// Anything that can hand out pages of messages by offset.
///
/// `fetch` must not fail: an unavailable source answers with an empty page.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(&self, skip: usize, limit: usize) -> MessagePage;
}

/// HTTP client for the external messages listing (`GET <url>?skip=&limit=`).
pub struct HttpMessageSource {
    http_client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpMessageSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .context("failed to build HTTP client for the message source")?;

        Ok(Self {
            http_client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self, skip: usize, limit: usize) -> Result<MessagePage> {
        let response = self
            .http_client
            .get(&self.url)
            .query(&[("skip", skip), ("limit", limit)])
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "source answered {} for skip={} limit={}",
                response.status(),
                skip,
                limit
            ));
        }

        let page: MessagePage = response
            .json()
            .await
            .context("malformed message page")?;

        Ok(page)
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn fetch(&self, skip: usize, limit: usize) -> MessagePage {
        match self.try_fetch(skip, limit).await {
            Ok(page) => {
                tracing::debug!(
                    "Fetched {} messages (skip={}, limit={}, total={:?}, skipped={})",
                    page.items.len(),
                    skip,
                    limit,
                    page.total,
                    page.skipped
                );
                page
            }
            Err(e) => {
                tracing::error!("Failed to fetch messages: {:#}", e);
                MessagePage::default()
            }
        }
    }
}
