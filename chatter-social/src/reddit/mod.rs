pub mod client;
pub mod extract;
pub mod types;

pub use client::{REDDIT_API_BASE, REDDIT_AUTH_BASE, RedditApi, RedditCredentials, RedditSession};
