use chatter_common::{ContentItem, Platform};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::twitter::types::Tweet;

/// Convert a tweet into a [`ContentItem`].
///
/// A missing or malformed `created_at` maps to epoch 0; tweets are never
/// date filtered so the timestamp is informational only.
pub fn tweet_to_item(tweet: &Tweet) -> ContentItem {
    let created_at = tweet
        .created_at
        .as_deref()
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
        .map(OffsetDateTime::unix_timestamp)
        .unwrap_or_else(|| {
            tracing::debug!(id = %tweet.id, raw = ?tweet.created_at, "tweet without usable created_at");
            0
        });

    let mut item = ContentItem::new(Platform::Twitter, &tweet.id, &tweet.text, created_at)
        .with_url(status_url(&tweet.id));
    if let Some(likes) = tweet.public_metrics.as_ref().and_then(|m| m.like_count) {
        item = item.with_score(i64::try_from(likes).unwrap_or(i64::MAX));
    }
    item
}

/// Canonical status URL; the handle is unknown without user expansions.
pub fn status_url(id: &str) -> String {
    format!("https://x.com/i/web/status/{id}")
}
