//! Reddit listing/thing wire models.
//!
//! Reddit wraps everything in `{"kind": .., "data": ..}` envelopes. Comment
//! listings mix real comments (`t1`) with `more` placeholders, and a
//! comment's `replies` is either a nested listing or the empty string.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
    #[serde(default)]
    pub after: Option<String>,
}

impl<T> Listing<T> {
    pub fn into_children(self) -> Vec<T> {
        self.data.children
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum PostThing {
    #[serde(rename = "t3")]
    Post(Post),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    /// Seconds since epoch; Reddit sends a float.
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub num_comments: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(Comment),
    /// "Load more comments" placeholder; never expanded.
    #[serde(rename = "more")]
    More(More),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub replies: Replies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct More {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replies {
    Listing(Box<Listing<CommentThing>>),
    /// Reddit sends `""` when there are no replies.
    Empty(String),
    #[default]
    Missing,
}

impl Replies {
    pub fn into_things(self) -> Vec<CommentThing> {
        match self {
            Replies::Listing(l) => l.into_children(),
            Replies::Empty(_) | Replies::Missing => Vec::new(),
        }
    }
}

/// `GET /comments/{id}` returns `[post listing, comment listing]`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsResponse(pub Listing<PostThing>, pub Listing<CommentThing>);
