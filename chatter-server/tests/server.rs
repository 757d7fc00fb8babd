use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatter_common::{ContentItem, Platform, PlatformFetchError, SearchRequest};
use chatter_config::PipelineConfig;
use chatter_llm::traits::LlmClient;
use chatter_llm::{LlmError, LlmResponse};
use chatter_pipeline::source::{ForumSession, ForumSource, MicroblogSource};
use chatter_pipeline::{Pipeline, Summarizer};
use chatter_server::{ErrorBody, SummarizeResponse};
use serde_json::json;
use tokio::net::TcpListener;

struct Forum(Vec<ContentItem>);

#[async_trait]
impl ForumSource for Forum {
    async fn open(&self) -> Result<Box<dyn ForumSession + '_>, PlatformFetchError> {
        Ok(Box::new(Session(&self.0)))
    }
}

struct Session<'a>(&'a [ContentItem]);

#[async_trait]
impl ForumSession for Session<'_> {
    async fn search(&self, _: &SearchRequest, _: u32) -> Result<Vec<ContentItem>, PlatformFetchError> {
        Ok(self.0.to_vec())
    }

    async fn comments(&self, _: &ContentItem, _: usize) -> Result<Vec<ContentItem>, PlatformFetchError> {
        Ok(vec![ContentItem::new(Platform::Reddit, "c", "<i>nice</i>", 0)])
    }
}

struct Tweets(Result<Vec<ContentItem>, String>);

#[async_trait]
impl MicroblogSource for Tweets {
    async fn search(&self, _: &str, _: u32) -> Result<Vec<ContentItem>, PlatformFetchError> {
        self.0
            .clone()
            .map_err(|m| PlatformFetchError::new(Platform::Twitter, "search", m))
    }
}

struct Llm(Mutex<Vec<Result<String, LlmError>>>);

#[async_trait]
impl LlmClient for Llm {
    async fn generate(
        &self,
        _: &str,
        _: Option<&str>,
        _: Option<u32>,
        _: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        let next = self.0.lock().unwrap().pop().unwrap_or(Err(LlmError::Empty));
        next.map(|text| LlmResponse {
            text,
            model: None,
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn post(title: &str) -> ContentItem {
    ContentItem::new(Platform::Reddit, title, "", 1_700_000_000)
        .with_title(title)
        .with_scope("rust")
        .with_score(7)
        .with_url("https://www.reddit.com/r/rust/comments/x/")
}

async fn spawn(posts: Vec<ContentItem>, tweets: Result<Vec<ContentItem>, String>, llm: Vec<Result<String, LlmError>>) -> SocketAddr {
    let pipeline = Pipeline::new(
        Arc::new(Forum(posts)),
        Arc::new(Tweets(tweets)),
        Summarizer::new(Arc::new(Llm(Mutex::new(llm))), Duration::from_millis(5)),
        PipelineConfig::default(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(chatter_server::serve(listener, Arc::new(pipeline)));
    addr
}

#[tokio::test]
async fn summarize_returns_plain_summary() {
    let addr = spawn(vec![post("Rust 2024")], Ok(vec![]), vec![Ok("- **Rust** trends".into())]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .json(&json!({"topic": "rust", "subreddit": "all", "start_date": null, "end_date": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let raw: serde_json::Value = resp.json().await.unwrap();
    assert!(raw.get("warnings").is_none());
    let body: SummarizeResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(body.summary, "- Rust trends");
}

#[tokio::test]
async fn empty_content_returns_sentinel_with_warning() {
    let addr = spawn(vec![], Err("server returned error 429".into()), vec![]).await;

    let body: SummarizeResponse = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .json(&json!({"topic": "rust"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.summary, "No content found for the given input.");
    assert_eq!(body.warnings, ["twitter search: server returned error 429"]);
}

#[tokio::test]
async fn bad_date_is_unprocessable() {
    let addr = spawn(vec![], Ok(vec![]), vec![]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .json(&json!({"topic": "rust", "start_date": "2024-02-31"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.error.contains("2024-02-31"));
}

#[tokio::test]
async fn missing_topic_gets_json_error_body() {
    let addr = spawn(vec![], Ok(vec![]), vec![]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .json(&json!({"subreddit": "rust"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.error.contains("topic"));
}

#[tokio::test]
async fn malformed_json_gets_json_error_body() {
    let addr = spawn(vec![], Ok(vec![]), vec![]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn summarization_failure_is_bad_gateway() {
    let rate_limited = || Err(LlmError::RateLimit("quota".into()));
    let addr = spawn(vec![post("a")], Ok(vec![]), vec![rate_limited(), rate_limited()]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/summarize"))
        .json(&json!({"topic": "rust"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn health_and_form_page() {
    let addr = spawn(vec![], Ok(vec![]), vec![]).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    let page = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(page.status(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains(r#"<form method="post" action="/">"#));
}

#[tokio::test]
async fn form_submission_renders_escaped_sections() {
    let tweets = vec![ContentItem::new(Platform::Twitter, "1", "crabs & <b>cargo</b>", 1_756_728_000)];
    let addr = spawn(vec![post("<Rust>")], Ok(tweets), vec![Ok("**Hot**: borrow checker".into())]).await;

    let html = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .form(&[("topic", "rust"), ("subreddit", "rust"), ("start_date", ""), ("end_date", "")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("<h3>&lt;Rust&gt;</h3>"));
    assert!(html.contains("<li>&lt;i&gt;nice&lt;/i&gt;</li>"));
    assert!(html.contains("crabs &amp; &lt;b&gt;cargo&lt;/b&gt;"));
    assert!(html.contains("2025-09-01 12:00:00 UTC"));
    assert!(html.contains("Hot: borrow checker"));
    assert!(!html.contains("<b>cargo</b>"));
}

#[tokio::test]
async fn form_validation_error_is_shown_inline() {
    let addr = spawn(vec![], Ok(vec![]), vec![]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .form(&[("topic", "rust"), ("start_date", "2024-03-01"), ("end_date", "2024-01-01")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    assert!(resp.text().await.unwrap().contains("is after end date"));
}
