//! Topic summarization pipeline.
//!
//! A request flows through five stages:
//!
//! 1. [`normalize`]: raw topic/subreddit/date strings → [`SearchRequest`]
//! 2. fetch: Reddit and Twitter concurrently, through the [`source`] traits
//! 3. [`filter`]: Reddit posts outside the date window are dropped
//! 4. [`aggregate`]: comments are attached and everything is flattened into
//!    a bounded text blob
//! 5. [`summarize`]: the blob is summarized, with one wait-and-retry on rate
//!    limiting
//!
//! [`Pipeline::run`] drives them and returns a [`PipelineReport`] that the
//! CLI, web form and JSON endpoint render.
//!
//! [`SearchRequest`]: chatter_common::SearchRequest
pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod summarize;

pub use aggregate::AggregatedText;
pub use filter::RedditOutcome;
pub use pipeline::{Pipeline, PipelineReport, RawQuery, Stage, SummaryOutcome};
pub use summarize::{NO_CONTENT_SUMMARY, SummarizationError, Summarizer};
