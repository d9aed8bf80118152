//! Raw records as the content source yields them, and the curated records
//! the selector builds from them.

use serde::{Deserialize, Serialize};

/// Placeholder Reddit uses for removed bodies and anonymized authors.
pub const DELETED: &str = "[deleted]";

/// Origin prepended to permalink fragments.
pub const SITE_ORIGIN: &str = "https://reddit.com";

/// A submission as supplied by a content source. Read-only to the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSubmission {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub score: i64,
    pub num_comments: u64,
    pub created_utc: f64,
    pub over_18: bool,
    pub author: Option<String>, // None when deleted/anonymized
    pub url: String,
    pub permalink: String,      // fragment, e.g. "/r/x/comments/abc/title/"
}

/// A comment entry. `body` is None for non-content placeholders.
#[derive(Clone, Debug, PartialEq)]
pub struct RawComment {
    pub id: String,
    pub body: Option<String>,
    pub score: i64,
    pub author: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuratedComment {
    pub id: String,
    pub body: String,
    pub score: i64,
    pub author: String,
}

/// A submission that passed both the keyword and the quality filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuratedPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub score: i64,
    pub num_comments: u64,
    pub created_utc: f64,
    pub subreddit: String,
    pub url: String,
    pub permalink: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CuratedComment>>,
}

/// `None` (or an empty name) resolves to `"[deleted]"`.
#[inline]
pub fn resolve_author(author: Option<&str>) -> String {
    match author {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DELETED.to_string(),
    }
}

#[inline]
pub fn full_permalink(fragment: &str) -> String {
    format!("{}{}", SITE_ORIGIN, fragment)
}
