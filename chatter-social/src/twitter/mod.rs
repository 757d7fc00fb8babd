//! Twitter/X API integration: the HTTP client wrapper, JSON extraction
//! helpers, and strongly typed response models.
pub mod client;
pub mod extract;
pub mod types;

pub use client::{TWITTER_API_BASE, TwitterApi};
