#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatter_common::{ContentItem, Platform, PlatformFetchError, SearchRequest};
use chatter_config::PipelineConfig;
use chatter_llm::traits::LlmClient;
use chatter_llm::{LlmError, LlmResponse};
use chatter_pipeline::source::{ForumSession, ForumSource, MicroblogSource};
use chatter_pipeline::{Pipeline, Summarizer};

#[derive(Default)]
pub struct StubForum {
    pub posts: Vec<ContentItem>,
    pub comments: HashMap<String, Vec<ContentItem>>,
    pub failing_posts: Vec<String>,
    pub auth_error: Option<String>,
    pub comment_calls: AtomicUsize,
}

impl StubForum {
    pub fn with_posts(posts: Vec<ContentItem>) -> Self {
        Self {
            posts,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ForumSource for StubForum {
    async fn open(&self) -> Result<Box<dyn ForumSession + '_>, PlatformFetchError> {
        match &self.auth_error {
            Some(msg) => Err(PlatformFetchError::new(Platform::Reddit, "authentication", msg)),
            None => Ok(Box::new(StubSession { forum: self })),
        }
    }
}

struct StubSession<'a> {
    forum: &'a StubForum,
}

#[async_trait]
impl ForumSession for StubSession<'_> {
    async fn search(
        &self,
        _req: &SearchRequest,
        limit: u32,
    ) -> Result<Vec<ContentItem>, PlatformFetchError> {
        Ok(self.forum.posts.iter().take(limit as usize).cloned().collect())
    }

    async fn comments(
        &self,
        post: &ContentItem,
        limit: usize,
    ) -> Result<Vec<ContentItem>, PlatformFetchError> {
        self.forum.comment_calls.fetch_add(1, Ordering::SeqCst);
        if self.forum.failing_posts.contains(&post.id) {
            return Err(PlatformFetchError::new(
                Platform::Reddit,
                format!("comments for {:?}", post.title.as_deref().unwrap_or_default()),
                "500 Internal Server Error",
            ));
        }
        Ok(self
            .forum
            .comments
            .get(&post.id)
            .map(|c| c.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

pub enum StubMicroblog {
    Tweets(Vec<ContentItem>),
    Fails(String),
}

#[async_trait]
impl MicroblogSource for StubMicroblog {
    async fn search(&self, _topic: &str, _limit: u32) -> Result<Vec<ContentItem>, PlatformFetchError> {
        match self {
            StubMicroblog::Tweets(t) => Ok(t.clone()),
            StubMicroblog::Fails(msg) => Err(PlatformFetchError::new(Platform::Twitter, "search", msg)),
        }
    }
}

/// Replays a fixed sequence of results and records every prompt.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Empty));
        next.map(|text| LlmResponse {
            text,
            model: Some("scripted".into()),
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn reddit_post(id: &str, created_at: i64) -> ContentItem {
    ContentItem::new(Platform::Reddit, id, "", created_at)
        .with_title(format!("Post {id}"))
        .with_scope("rust")
        .with_score(1)
}

pub fn comment(id: &str, body: &str) -> ContentItem {
    ContentItem::new(Platform::Reddit, id, body, 0)
}

pub fn tweet(id: &str, text: &str) -> ContentItem {
    ContentItem::new(Platform::Twitter, id, text, 0)
}

pub fn pipeline(forum: StubForum, microblog: StubMicroblog, llm: Arc<ScriptedLlm>) -> Pipeline {
    Pipeline::new(
        Arc::new(forum),
        Arc::new(microblog),
        Summarizer::new(llm, Duration::from_millis(20)),
        PipelineConfig::default(),
    )
}
