//! Comment expansion and the bounded text blob handed to the summarizer.
use std::fmt::Write as _;

use chatter_common::{ContentItem, PlatformFetchError};
use serde::Serialize;

use crate::source::ForumSession;

/// Concatenated post/comment/tweet text, at most `blob_chars` characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregatedText(String);

impl AggregatedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateLimits {
    pub comments_per_post: usize,
    pub comment_chars: usize,
    pub blob_chars: usize,
}

impl From<&chatter_config::PipelineConfig> for AggregateLimits {
    fn from(cfg: &chatter_config::PipelineConfig) -> Self {
        Self {
            comments_per_post: cfg.comments_per_post,
            comment_chars: cfg.comment_chars,
            blob_chars: cfg.blob_chars,
        }
    }
}

/// Longest prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Attach up to `comments_per_post` truncated comments to each post.
///
/// Comment fetches run one post at a time. A failed fetch leaves that post
/// without comments and records a warning.
pub async fn expand_comments(
    session: &dyn ForumSession,
    posts: Vec<ContentItem>,
    limits: AggregateLimits,
    warnings: &mut Vec<PlatformFetchError>,
) -> Vec<ContentItem> {
    let mut out = Vec::with_capacity(posts.len());
    for post in posts {
        match session.comments(&post, limits.comments_per_post).await {
            Ok(comments) => {
                let comments = comments
                    .into_iter()
                    .take(limits.comments_per_post)
                    .map(|mut c| {
                        c.body = truncate_chars(c.body.trim(), limits.comment_chars).to_string();
                        c
                    })
                    .collect();
                out.push(post.with_children(comments));
            }
            Err(err) => {
                tracing::warn!(target: "pipeline", post_id = %post.id, error = %err, "pipeline.comments.failed");
                warnings.push(err);
                out.push(post);
            }
        }
    }
    out
}

/// Render posts (with comments) then tweets, in order, capped at `max_chars`.
pub fn build_blob(posts: &[ContentItem], tweets: &[ContentItem], max_chars: usize) -> AggregatedText {
    let mut blob = String::new();
    for post in posts {
        let title = post.title.as_deref().unwrap_or(post.body.as_str());
        let _ = writeln!(blob, "Post: {title}");
        for comment in &post.children {
            let _ = writeln!(blob, "Comment: {}", comment.body);
        }
    }
    for tweet in tweets {
        let _ = writeln!(blob, "Tweet: {}", tweet.body);
    }

    let full = blob.chars().count();
    if full > max_chars {
        tracing::debug!(target: "pipeline", full, max_chars, "pipeline.blob.truncated");
        blob.truncate(truncate_chars(&blob, max_chars).len());
    }
    AggregatedText(blob)
}
