//! Relevance Scoring
//!
//! Additive, integer relevance signals plus a fractional recency nudge.
//!
//! | Signal                              | Points |
//! |-------------------------------------|--------|
//! | user name equals query              | +5     |
//! | message equals query                | +4     |
//! | user name contains query            | +3     |
//! | message contains query              | +2     |
//! | user name within edit distance 1    | +2     |
//! | user name within edit distance 2    | +1     |
//! | message within edit distance 1      | +1     |
//!
//! Fuzzy signals only apply when both strings are shorter than [`FUZZY_MAX_CHARS`].

use crate::source::types::Message;

use chrono::{DateTime, Utc};

/// Strings at or above this length (in chars) are never compared fuzzily.
pub const FUZZY_MAX_CHARS: usize = 20;

/// Length difference beyond which two strings cannot be within the fuzzy thresholds.
const MAX_LENGTH_DELTA: usize = 2;

/// Divisor turning epoch seconds into a sub-integer tie-break.
const RECENCY_SCALE: f64 = 1e12;

/// Distance reported for pairs rejected by the length check.
pub const FAR: usize = usize::MAX;

/// A lower-cased, trimmed query, prepared once per search.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    text: String,
    chars: usize,
}

impl NormalizedQuery {
    /// Returns `None` for an empty or whitespace-only query.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let chars = text.chars().count();
        Some(Self { text, chars })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Integer relevance of `message` for `query`; zero means irrelevant.
pub fn relevance(message: &Message, query: &NormalizedQuery) -> u32 {
    let q = query.as_str();
    let username = message.user_name.to_lowercase();
    let body = message.message.to_lowercase();
    let mut score = 0;

    if username == q {
        score += 5;
    }
    if body == q {
        score += 4;
    }
    if username.contains(q) {
        score += 3;
    }
    if body.contains(q) {
        score += 2;
    }

    if query.chars < FUZZY_MAX_CHARS && username.chars().count() < FUZZY_MAX_CHARS {
        match edit_distance(&username, q) {
            1 => score += 2,
            2 => score += 1,
            _ => {}
        }
    }
    if query.chars < FUZZY_MAX_CHARS
        && body.chars().count() < FUZZY_MAX_CHARS
        && edit_distance(&body, q) == 1
    {
        score += 1;
    }

    score
}

/// Full ranking score: relevance plus a recency nudge far below one point.
///
/// Returns `None` for irrelevant messages so they can be dropped before sorting.
pub fn ranking_score(message: &Message, query: &NormalizedQuery) -> Option<f64> {
    match relevance(message, query) {
        0 => None,
        points => Some(f64::from(points) + recency_nudge(&message.timestamp)),
    }
}

/// `epoch_seconds / 1e12`: about 0.0017 for present-day timestamps.
pub fn recency_nudge(timestamp: &DateTime<Utc>) -> f64 {
    let seconds =
        timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) / 1e9;
    seconds / RECENCY_SCALE
}

/// Levenshtein distance over chars, or [`FAR`] when the lengths differ by more than two.
///
/// The distance is never smaller than the length difference, so the early exit cannot
/// reject a pair that the full computation would place within distance 2.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > MAX_LENGTH_DELTA {
        return FAR;
    }

    // Single-row dynamic programming.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b.len()]
}
