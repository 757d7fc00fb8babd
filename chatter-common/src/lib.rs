//! Common types and utilities shared across Chatter crates.
//!
//! This crate defines the request/content model that flows through the
//! summarization pipeline, the shared error taxonomy, and the observability
//! helpers used by every binary. It stays dependency-light so that the HTTP,
//! social, LLM and pipeline crates can all depend on it.
//!
//! # Overview
//!
//! - [`SearchRequest`] and [`TimeWindow`]: a normalized topic search
//! - [`ContentItem`] and [`Platform`]: fetched posts, comments and tweets
//! - [`Summary`]: the generated text handed back to callers
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ChatterError`], [`ValidationError`], [`PlatformFetchError`] and [`Result`]
//!
//! # Examples
//!
//! ```rust
//! use chatter_common::{SearchRequest, TimeWindow};
//!
//! let req = SearchRequest::new("rust", "all", TimeWindow::unbounded());
//! assert!(req.is_unscoped());
//! assert!(req.window.contains(0));
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

/// Scope sentinel meaning "search every community".
pub const ALL_SCOPE: &str = "all";

/// Source platform of a [`ContentItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Forum-style platform with threaded comments.
    Reddit,
    /// Microblog platform with short timestamped posts.
    Twitter,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Reddit => f.write_str("reddit"),
            Platform::Twitter => f.write_str("twitter"),
        }
    }
}

/// Inclusive creation-time window in epoch seconds (UTC).
///
/// The window only constrains anything once `start` is set. Without a start an
/// `end` alone filters nothing; with a start and no end there is no upper
/// bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// True when the window keeps every timestamp, i.e. no start is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none()
    }

    /// Whether `ts` falls inside the window.
    ///
    /// ```
    /// use chatter_common::TimeWindow;
    ///
    /// let w = TimeWindow::between(10, 20);
    /// assert!(w.contains(10) && w.contains(20));
    /// assert!(!w.contains(21));
    ///
    /// let end_only = TimeWindow { start: None, end: Some(20) };
    /// assert!(end_only.contains(21));
    /// ```
    pub fn contains(&self, ts: i64) -> bool {
        match self.start {
            None => true,
            Some(start) => start <= ts && self.end.map_or(true, |end| ts <= end),
        }
    }
}

/// A normalized search over both platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub topic: String,
    /// Subreddit name, or [`ALL_SCOPE`].
    pub scope: String,
    pub window: TimeWindow,
}

impl SearchRequest {
    pub fn new(topic: impl Into<String>, scope: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            topic: topic.into(),
            scope: scope.into(),
            window,
        }
    }

    pub fn is_unscoped(&self) -> bool {
        self.scope.eq_ignore_ascii_case(ALL_SCOPE)
    }
}

/// A fetched post, comment or tweet.
///
/// Top-level items may carry `children` (comments); children never carry
/// children of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub platform: Platform,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    /// Epoch seconds (UTC).
    pub created_at: i64,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    /// Community the item was posted in (subreddit), when the platform has one.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub children: Vec<ContentItem>,
}

impl ContentItem {
    pub fn new(
        platform: Platform,
        id: impl Into<String>,
        body: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            platform,
            title: None,
            body: body.into(),
            created_at,
            score: None,
            url: None,
            scope: None,
            children: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Attach comments, dropping any grandchildren so depth stays at one.
    pub fn with_children(mut self, children: Vec<ContentItem>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut c| {
                c.children.clear();
                c
            })
            .collect();
        self
    }
}

/// `YYYY-MM-DD HH:MM:SS UTC` for an epoch-seconds timestamp; `unknown` when
/// the value is zero or out of range.
pub fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) if ts != 0 => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        _ => "unknown".to_string(),
    }
}

/// Generated summary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Summary text with markdown bold markers removed.
    pub fn plain_text(&self) -> String {
        self.text.replace("**", "")
    }
}

/// Rejected user input. Raised before any platform is contacted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("invalid {field} date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("invalid subreddit {0:?}: use letters, digits and underscores")]
    InvalidScope(String),
}

/// A platform call that failed. Reported to the user, never fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{platform} {context}: {message}")]
pub struct PlatformFetchError {
    pub platform: Platform,
    /// What was being fetched, e.g. `search` or `comments for "<title>"`.
    pub context: String,
    pub message: String,
}

impl PlatformFetchError {
    pub fn new(platform: Platform, context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            platform,
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Error types used across the Chatter system.
#[derive(thiserror::Error, Debug)]
pub enum ChatterError {
    /// The request was rejected before fetching.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A platform call failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] PlatformFetchError),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ChatterError`].
pub type Result<T> = std::result::Result<T, ChatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_window_contains_everything() {
        let w = TimeWindow::unbounded();
        assert!(w.is_unbounded());
        assert!(w.contains(i64::MIN));
        assert!(w.contains(i64::MAX));
    }

    #[test]
    fn start_without_end_has_no_upper_bound() {
        let from = TimeWindow {
            start: Some(100),
            end: None,
        };
        assert!(!from.is_unbounded());
        assert!(!from.contains(99));
        assert!(from.contains(1_000_000));
    }

    #[test]
    fn end_without_start_filters_nothing() {
        let until = TimeWindow {
            start: None,
            end: Some(100),
        };
        assert!(until.is_unbounded());
        assert!(until.contains(-5));
        assert!(until.contains(101));
    }

    #[test]
    fn children_are_flattened_to_depth_one() {
        let grandchild = ContentItem::new(Platform::Reddit, "c2", "deep", 3);
        let child = ContentItem::new(Platform::Reddit, "c1", "reply", 2)
            .with_children(vec![grandchild.clone()]);
        assert_eq!(child.children.len(), 1);

        let mut nested = child.clone();
        nested.children = vec![grandchild];
        let post = ContentItem::new(Platform::Reddit, "p", "", 1).with_children(vec![nested]);
        assert!(post.children[0].children.is_empty());
    }

    #[test]
    fn plain_text_strips_bold_markers() {
        let s = Summary::new("- **Rust** is trending");
        assert_eq!(s.plain_text(), "- Rust is trending");
    }

    #[test]
    fn scope_all_is_case_insensitive() {
        assert!(SearchRequest::new("x", "ALL", TimeWindow::unbounded()).is_unscoped());
        assert!(!SearchRequest::new("x", "rust", TimeWindow::unbounded()).is_unscoped());
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(1_756_728_000), "2025-09-01 12:00:00 UTC");
        assert_eq!(format_timestamp(0), "unknown");
    }

    #[test]
    fn fetch_error_display_names_platform() {
        let e = PlatformFetchError::new(Platform::Twitter, "search", "429 Too Many Requests");
        assert_eq!(e.to_string(), "twitter search: 429 Too Many Requests");
    }
}
