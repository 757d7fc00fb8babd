//! Minimal wrapper around the Twitter/X recent-search API.
//!
//! Shapes the query (reposts excluded, result count clamped to the API's
//! accepted range) and delegates to the shared HTTP client. Only the first
//! page is requested; `meta.next_token` is never followed.
use crate::twitter::types::SearchResponse;
use chatter_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;

pub const TWITTER_API_BASE: &str = "https://api.twitter.com";

const SEARCH_PATH: &str = "2/tweets/search/recent";
const TWEET_FIELDS: &str = "author_id,created_at,conversation_id";
const MIN_RESULTS: u32 = 10;
const MAX_RESULTS: u32 = 100;

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl TwitterApi {
    pub fn new(bearer_token: String) -> Result<Self, HttpError> {
        Ok(Self::with_http(HttpClient::new(TWITTER_API_BASE)?, bearer_token))
    }

    /// Use a preconfigured client (custom base URL or timeouts).
    pub fn with_http(http: HttpClient, bearer_token: String) -> Self {
        Self {
            http,
            bearer: bearer_token,
        }
    }

    /// Search the last seven days of tweets for `topic`, excluding reposts.
    ///
    /// `max_results` is clamped to `10..=100`. Any non-2xx status comes back
    /// as [`HttpError::Api`] carrying the status and the server's message.
    pub async fn recent_search(
        &self,
        topic: &str,
        max_results: u32,
    ) -> Result<SearchResponse, HttpError> {
        let max_results = clamp_max_results(max_results);
        let params: Vec<(&str, Cow<'_, str>)> = vec![
            ("query", exclude_reposts(topic).into()),
            ("max_results", max_results.to_string().into()),
            ("tweet.fields", TWEET_FIELDS.into()),
        ];

        let resp: SearchResponse = self
            .http
            .get_json(
                SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            target: "social.twitter",
            topic,
            result_count = resp.data.as_ref().map_or(0, Vec::len),
            next_token = ?resp.meta.as_ref().and_then(|m| m.next_token.as_deref()),
            "twitter.recent_search.done"
        );
        Ok(resp)
    }
}

pub(crate) fn clamp_max_results(requested: u32) -> u32 {
    requested.clamp(MIN_RESULTS, MAX_RESULTS)
}

pub(crate) fn exclude_reposts(topic: &str) -> String {
    format!("{} -is:retweet", topic.trim())
}
