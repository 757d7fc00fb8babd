//! Social network clients used by Chatter.
//!
//! [`reddit`] covers application-only OAuth, subreddit search and comment
//! trees; [`twitter`] covers the v2 recent-search endpoint. Both map their
//! wire models onto [`chatter_common::ContentItem`] in their `extract`
//! modules so the pipeline never sees platform JSON.
pub mod reddit;
pub mod twitter;
