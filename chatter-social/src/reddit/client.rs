//! Reddit API client using the application-only OAuth grant.
//!
//! [`RedditApi::session`] exchanges the client id/secret for a bearer token;
//! the returned [`RedditSession`] is owned by a single pipeline run and
//! issues the search and comment requests with that token.
use crate::reddit::types::{AccessToken, CommentThing, CommentsResponse, Listing, Post, PostThing};
use chatter_http::header::{HeaderMap, HeaderValue, USER_AGENT};
use chatter_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;

pub const REDDIT_AUTH_BASE: &str = "https://www.reddit.com";
pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

const TOKEN_PATH: &str = "api/v1/access_token";

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Clone)]
pub struct RedditApi {
    auth_http: HttpClient,
    api_http: HttpClient,
    creds: RedditCredentials,
}

impl RedditApi {
    pub fn new(creds: RedditCredentials) -> Result<Self, HttpError> {
        Ok(Self::with_http(
            HttpClient::new(REDDIT_AUTH_BASE)?,
            HttpClient::new(REDDIT_API_BASE)?,
            creds,
        ))
    }

    /// Use preconfigured clients for the token endpoint and the OAuth API.
    pub fn with_http(auth_http: HttpClient, api_http: HttpClient, creds: RedditCredentials) -> Self {
        Self {
            auth_http,
            api_http,
            creds,
        }
    }

    fn user_agent_headers(&self) -> Result<HeaderMap, HttpError> {
        let ua = HeaderValue::from_str(self.creds.user_agent.trim())
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, ua);
        Ok(headers)
    }

    /// Obtain a bearer token and open a session bound to it.
    pub async fn session(&self) -> Result<RedditSession<'_>, HttpError> {
        let token: AccessToken = self
            .auth_http
            .post_form(
                TOKEN_PATH,
                &[("grant_type", "client_credentials")],
                RequestOpts {
                    auth: Some(Auth::Basic {
                        user: &self.creds.client_id,
                        password: &self.creds.client_secret,
                    }),
                    headers: Some(self.user_agent_headers()?),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            target: "social.reddit",
            expires_in = ?token.expires_in,
            scope = ?token.scope,
            "reddit.token.acquired"
        );

        Ok(RedditSession {
            api: self,
            token: token.access_token,
        })
    }
}

/// Request-scoped handle carrying an access token.
pub struct RedditSession<'a> {
    api: &'a RedditApi,
    token: String,
}

impl RedditSession<'_> {
    fn opts<'q>(&'q self, query: Vec<(&'q str, Cow<'q, str>)>) -> Result<RequestOpts<'q>, HttpError> {
        Ok(RequestOpts {
            auth: Some(Auth::Bearer(&self.token)),
            headers: Some(self.api.user_agent_headers()?),
            query: Some(query),
            ..Default::default()
        })
    }

    /// Relevance-ranked search within `subreddit` (or `all`), first page only.
    pub async fn search(
        &self,
        subreddit: &str,
        topic: &str,
        limit: u32,
    ) -> Result<Vec<Post>, HttpError> {
        let restrict = !subreddit.eq_ignore_ascii_case("all");
        let path = format!("r/{subreddit}/search");
        let listing: Listing<PostThing> = self
            .api
            .api_http
            .get_json(
                &path,
                self.opts(vec![
                    ("q", topic.into()),
                    ("sort", "relevance".into()),
                    ("limit", limit.to_string().into()),
                    ("restrict_sr", restrict.to_string().into()),
                    ("type", "link".into()),
                    ("raw_json", "1".into()),
                ])?,
            )
            .await?;

        let posts: Vec<Post> = listing
            .into_children()
            .into_iter()
            .map(|PostThing::Post(p)| p)
            .take(limit as usize)
            .collect();

        tracing::debug!(
            target: "social.reddit",
            subreddit,
            topic,
            result_count = posts.len(),
            "reddit.search.done"
        );
        Ok(posts)
    }

    /// Comment tree for `post_id`, top-level only; `more` stubs stay unexpanded.
    pub async fn comments(&self, post_id: &str, limit: usize) -> Result<Vec<CommentThing>, HttpError> {
        let path = format!("comments/{post_id}");
        let CommentsResponse(_, comments) = self
            .api
            .api_http
            .get_json(
                &path,
                self.opts(vec![
                    ("limit", limit.to_string().into()),
                    ("depth", "1".into()),
                    ("sort", "confidence".into()),
                    ("raw_json", "1".into()),
                ])?,
            )
            .await?;
        Ok(comments.into_children())
    }
}
