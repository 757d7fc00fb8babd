//! Platform seams used by the pipeline.
//!
//! The forum side is session based: [`ForumSource::open`] authenticates once
//! per request and the returned [`ForumSession`] serves both the search and
//! the per-post comment fetches. Every failure is reported as a
//! [`PlatformFetchError`] so callers can turn it into a warning.
use async_trait::async_trait;
use chatter_common::{ContentItem, Platform, PlatformFetchError, SearchRequest};
use chatter_http::HttpError;
use chatter_social::reddit::extract::{comment_to_item, flatten_comments, post_to_item};
use chatter_social::reddit::{RedditApi, RedditSession};
use chatter_social::twitter::TwitterApi;
use chatter_social::twitter::extract::tweet_to_item;

#[async_trait]
pub trait ForumSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ForumSession + '_>, PlatformFetchError>;
}

#[async_trait]
pub trait ForumSession: Send + Sync {
    /// Relevance-ranked posts for the request's topic and scope.
    async fn search(
        &self,
        req: &SearchRequest,
        limit: u32,
    ) -> Result<Vec<ContentItem>, PlatformFetchError>;

    /// Up to `limit` comments of `post`, breadth first.
    async fn comments(
        &self,
        post: &ContentItem,
        limit: usize,
    ) -> Result<Vec<ContentItem>, PlatformFetchError>;
}

#[async_trait]
pub trait MicroblogSource: Send + Sync {
    async fn search(&self, topic: &str, limit: u32)
    -> Result<Vec<ContentItem>, PlatformFetchError>;
}

fn reddit_error(context: impl Into<String>, err: HttpError) -> PlatformFetchError {
    PlatformFetchError::new(Platform::Reddit, context, err)
}

pub struct RedditSource {
    api: RedditApi,
}

impl RedditSource {
    pub fn new(api: RedditApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ForumSource for RedditSource {
    async fn open(&self) -> Result<Box<dyn ForumSession + '_>, PlatformFetchError> {
        let session = self
            .api
            .session()
            .await
            .map_err(|e| reddit_error("authentication", e))?;
        Ok(Box::new(session))
    }
}

#[async_trait]
impl ForumSession for RedditSession<'_> {
    async fn search(
        &self,
        req: &SearchRequest,
        limit: u32,
    ) -> Result<Vec<ContentItem>, PlatformFetchError> {
        let posts = RedditSession::search(self, &req.scope, &req.topic, limit)
            .await
            .map_err(|e| reddit_error("search", e))?;
        Ok(posts.iter().map(post_to_item).collect())
    }

    async fn comments(
        &self,
        post: &ContentItem,
        limit: usize,
    ) -> Result<Vec<ContentItem>, PlatformFetchError> {
        let context = || {
            format!(
                "comments for {:?}",
                post.title.as_deref().unwrap_or(post.id.as_str())
            )
        };
        let things = RedditSession::comments(self, &post.id, limit)
            .await
            .map_err(|e| reddit_error(context(), e))?;
        Ok(flatten_comments(things, limit)
            .iter()
            .map(comment_to_item)
            .collect())
    }
}

pub struct TwitterSource {
    api: TwitterApi,
}

impl TwitterSource {
    pub fn new(api: TwitterApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MicroblogSource for TwitterSource {
    async fn search(
        &self,
        topic: &str,
        limit: u32,
    ) -> Result<Vec<ContentItem>, PlatformFetchError> {
        let resp = self
            .api
            .recent_search(topic, limit)
            .await
            .map_err(|e| PlatformFetchError::new(Platform::Twitter, "search", e))?;
        Ok(resp.into_tweets().iter().map(tweet_to_item).collect())
    }
}
