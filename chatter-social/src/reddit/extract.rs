use std::collections::VecDeque;

use chatter_common::{ContentItem, Platform};

use crate::reddit::client::REDDIT_AUTH_BASE;
use crate::reddit::types::{Comment, CommentThing, Post};

/// Convert a search hit into a top-level [`ContentItem`] without comments.
pub fn post_to_item(post: &Post) -> ContentItem {
    let mut item = ContentItem::new(Platform::Reddit, &post.id, &post.selftext, post.created_utc as i64)
        .with_title(&post.title)
        .with_score(post.score);
    if !post.subreddit.is_empty() {
        item = item.with_scope(&post.subreddit);
    }
    if let Some(url) = post_url(post) {
        item = item.with_url(url);
    }
    item
}

pub fn comment_to_item(comment: &Comment) -> ContentItem {
    let mut item = ContentItem::new(
        Platform::Reddit,
        &comment.id,
        comment.body.trim(),
        comment.created_utc as i64,
    )
    .with_score(comment.score);
    if let Some(url) = comment.permalink.as_deref().and_then(absolute_permalink) {
        item = item.with_url(url);
    }
    item
}

/// Breadth-first walk over a comment tree keeping at most `limit` real
/// comments. `more` placeholders are skipped, never followed.
pub fn flatten_comments(things: Vec<CommentThing>, limit: usize) -> Vec<Comment> {
    let mut queue: VecDeque<CommentThing> = things.into();
    let mut out = Vec::with_capacity(limit.min(queue.len()));

    while out.len() < limit {
        let Some(thing) = queue.pop_front() else {
            break;
        };
        match thing {
            CommentThing::Comment(mut c) => {
                queue.extend(std::mem::take(&mut c.replies).into_things());
                out.push(c);
            }
            CommentThing::More(more) => {
                tracing::trace!(target: "social.reddit", count = more.count, "skipping more placeholder");
            }
        }
    }
    out
}

fn post_url(post: &Post) -> Option<String> {
    post.permalink
        .as_deref()
        .and_then(absolute_permalink)
        .or_else(|| post.url.clone().filter(|u| !u.is_empty()))
}

fn absolute_permalink(permalink: &str) -> Option<String> {
    if permalink.is_empty() {
        return None;
    }
    url::Url::parse(REDDIT_AUTH_BASE)
        .and_then(|base| base.join(permalink))
        .map(String::from)
        .ok()
}
