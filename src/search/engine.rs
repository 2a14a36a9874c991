use super::error::SearchError;
use super::scoring::{NormalizedQuery, ranking_score};
use crate::cache::store::{CacheSnapshot, MessageCache};
use crate::source::types::Message;

use std::sync::Arc;

/// One page of ranked results plus the number of relevant messages overall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Message>,
    pub total_matches: usize,
}

/// A message paired with its ranking score for the duration of one query.
#[derive(Debug)]
pub struct ScoredMessage<'a> {
    pub score: f64,
    pub message: &'a Message,
}

/// Scores every message in `snapshot` and returns all relevant ones, best first.
///
/// Equal scores (same relevance and same timestamp) keep cache order.
pub fn rank<'a>(snapshot: &'a CacheSnapshot, query: &NormalizedQuery) -> Vec<ScoredMessage<'a>> {
    let mut scored: Vec<ScoredMessage<'a>> = snapshot
        .messages
        .iter()
        .filter_map(|message| {
            ranking_score(message, query).map(|score| ScoredMessage { score, message })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Ranks `snapshot` for `query` and cuts out the `[skip, skip + limit)` window.
pub fn search_snapshot(
    snapshot: &CacheSnapshot,
    query: &str,
    skip: usize,
    limit: usize,
) -> Result<SearchPage, SearchError> {
    let query = NormalizedQuery::new(query).ok_or(SearchError::EmptyQuery)?;

    if snapshot.is_empty() {
        tracing::warn!("Search on empty cache");
        return Ok(SearchPage::default());
    }

    let ranked = rank(snapshot, &query);
    let total_matches = ranked.len();
    let items = ranked
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|scored| scored.message.clone())
        .collect();

    Ok(SearchPage {
        items,
        total_matches,
    })
}

/// Searches the current cache snapshot.
///
/// Scoring runs on the blocking pool so a large cache does not stall the async workers.
/// A fault on that side is logged and reported as [`SearchError::Failed`].
pub async fn search(
    cache: &MessageCache,
    query: &str,
    skip: usize,
    limit: usize,
) -> Result<SearchPage, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    tracing::info!("Searching: query='{}', skip={}, limit={}", query, skip, limit);

    let snapshot: Arc<CacheSnapshot> = cache.snapshot().await;
    tracing::debug!("Total messages in cache: {}", snapshot.len());

    let query = query.to_string();
    let page = tokio::task::spawn_blocking(move || search_snapshot(&snapshot, &query, skip, limit))
        .await
        .map_err(|e| {
            tracing::error!("Unexpected search error: {}", e);
            SearchError::Failed
        })??;

    tracing::info!(
        "Returning {} results (ranked), total matches={}",
        page.items.len(),
        page.total_matches
    );
    Ok(page)
}
