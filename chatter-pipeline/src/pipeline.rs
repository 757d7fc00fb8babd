use std::sync::Arc;
use std::time::Duration;

use chatter_common::{ChatterError, ContentItem, PlatformFetchError, SearchRequest, Summary};
use chatter_config::{ChatterConfig, PipelineConfig};
use chatter_http::HttpClient;
use chatter_social::reddit::{REDDIT_API_BASE, REDDIT_AUTH_BASE, RedditApi, RedditCredentials};
use chatter_social::twitter::{TWITTER_API_BASE, TwitterApi};
use serde::Deserialize;

use crate::aggregate::{AggregateLimits, AggregatedText, build_blob, expand_comments};
use crate::filter::{RedditOutcome, filter_by_window};
use crate::normalize::normalize;
use crate::source::{ForumSession, ForumSource, MicroblogSource, RedditSource, TwitterSource};
use crate::summarize::{SummarizationError, Summarizer};

/// Raw, unvalidated query as typed by a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuery {
    pub topic: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalizing,
    Fetching,
    Filtering,
    Aggregating,
    Summarizing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// Summarization was not requested.
    Skipped,
    Done(Summary),
    Failed(SummarizationError),
}

/// Everything fetched and produced for one request.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub request: SearchRequest,
    /// Retained posts with their comments attached.
    pub posts: Vec<ContentItem>,
    /// Tweets are not date filtered; recent search only covers the last seven days.
    pub tweets: Vec<ContentItem>,
    pub reddit: RedditOutcome,
    pub warnings: Vec<PlatformFetchError>,
    pub blob: AggregatedText,
    pub summary: SummaryOutcome,
}

impl PipelineReport {
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

pub struct Pipeline {
    forum: Arc<dyn ForumSource>,
    microblog: Arc<dyn MicroblogSource>,
    summarizer: Summarizer,
    limits: PipelineConfig,
}

fn enter(stage: Stage) {
    tracing::debug!(target: "pipeline", ?stage, "pipeline.stage");
}

impl Pipeline {
    pub fn new(
        forum: Arc<dyn ForumSource>,
        microblog: Arc<dyn MicroblogSource>,
        summarizer: Summarizer,
        limits: PipelineConfig,
    ) -> Self {
        Self {
            forum,
            microblog,
            summarizer,
            limits,
        }
    }

    /// Wire the production clients from configuration.
    pub fn from_config(cfg: &ChatterConfig) -> chatter_common::Result<Self> {
        let reddit = cfg
            .reddit
            .as_ref()
            .ok_or_else(|| ChatterError::Config("missing `reddit` section".into()))?;
        let twitter = cfg
            .twitter
            .as_ref()
            .ok_or_else(|| ChatterError::Config("missing `twitter` section".into()))?;
        let llm_cfg = cfg
            .llm
            .as_ref()
            .ok_or_else(|| ChatterError::Config("missing `llm` section".into()))?;

        let connect = Duration::from_secs(cfg.http.connect_timeout_secs);
        let timeout = Duration::from_secs(cfg.http.timeout_secs);
        let http = |base: &str| {
            HttpClient::with_connect_timeout(base, connect)
                .map(|c| c.with_timeout(timeout))
                .map_err(|e| ChatterError::Config(e.to_string()))
        };

        let reddit_api = RedditApi::with_http(
            http(REDDIT_AUTH_BASE)?,
            http(REDDIT_API_BASE)?,
            RedditCredentials {
                client_id: reddit.client_id.clone(),
                client_secret: reddit.client_secret.clone(),
                user_agent: reddit.user_agent.clone(),
            },
        );
        let twitter_api = TwitterApi::with_http(http(TWITTER_API_BASE)?, twitter.bearer_token.clone());
        let llm = chatter_llm::build_llm_client(llm_cfg, &cfg.http)?;

        Ok(Self::new(
            Arc::new(RedditSource::new(reddit_api)),
            Arc::new(TwitterSource::new(twitter_api)),
            Summarizer::new(llm, Duration::from_secs(cfg.pipeline.rate_limit_wait_secs)),
            cfg.pipeline.clone(),
        ))
    }

    /// Run every stage. Only validation aborts; fetch problems become
    /// warnings and a summarization failure is carried in the report.
    pub async fn run(&self, query: &RawQuery, summarize: bool) -> chatter_common::Result<PipelineReport> {
        enter(Stage::Normalizing);
        let request = normalize(
            &query.topic,
            &query.subreddit,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .inspect_err(|err| {
            tracing::debug!(target: "pipeline", error = %err, "pipeline.rejected");
            enter(Stage::Failed);
        })?;

        tracing::info!(
            target: "pipeline",
            topic = %request.topic,
            scope = %request.scope,
            window = ?request.window,
            "pipeline.start"
        );

        enter(Stage::Fetching);
        let mut warnings = Vec::new();
        let (forum, tweets) = tokio::join!(self.fetch_forum(&request), self.fetch_microblog(&request));
        let (session, raw_posts) = match forum {
            Ok((session, posts)) => (Some(session), posts),
            Err(err) => {
                warnings.push(err);
                (None, Vec::new())
            }
        };
        let tweets = tweets.unwrap_or_else(|err| {
            warnings.push(err);
            Vec::new()
        });

        enter(Stage::Filtering);
        let (posts, reddit) = filter_by_window(raw_posts, &request.window);
        tracing::debug!(target: "pipeline", ?reddit, tweets = tweets.len(), "pipeline.filtered");

        enter(Stage::Aggregating);
        let limits = AggregateLimits::from(&self.limits);
        let posts = match session.as_deref() {
            Some(session) if !posts.is_empty() => {
                expand_comments(session, posts, limits, &mut warnings).await
            }
            _ => posts,
        };
        let blob = build_blob(&posts, &tweets, limits.blob_chars);

        let summary = if summarize {
            enter(Stage::Summarizing);
            match self.summarizer.summarize(&blob).await {
                Ok(summary) => {
                    enter(Stage::Done);
                    SummaryOutcome::Done(summary)
                }
                Err(err) => {
                    tracing::error!(target: "pipeline", error = %err, "pipeline.summarize.failed");
                    enter(Stage::Failed);
                    SummaryOutcome::Failed(err)
                }
            }
        } else {
            enter(Stage::Done);
            SummaryOutcome::Skipped
        };

        tracing::info!(
            target: "pipeline",
            posts = posts.len(),
            tweets = tweets.len(),
            warnings = warnings.len(),
            blob_chars = blob.char_count(),
            "pipeline.finish"
        );

        Ok(PipelineReport {
            request,
            posts,
            tweets,
            reddit,
            warnings,
            blob,
            summary,
        })
    }

    async fn fetch_forum(
        &self,
        req: &SearchRequest,
    ) -> Result<(Box<dyn ForumSession + '_>, Vec<ContentItem>), PlatformFetchError> {
        let session = self.forum.open().await?;
        let posts = session.search(req, self.limits.post_limit).await?;
        Ok((session, posts))
    }

    async fn fetch_microblog(&self, req: &SearchRequest) -> Result<Vec<ContentItem>, PlatformFetchError> {
        self.microblog.search(&req.topic, self.limits.tweet_limit).await
    }
}
