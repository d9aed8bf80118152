//! Content source boundary: where raw submissions and their comments come from.

use crate::model::{RawComment, RawSubmission};
use std::fmt;
use thiserror::Error;

/// Source-level failure. The aggregator treats any of these as
/// "zero results for this community" and moves on.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("community not found: {0}")]
    CommunityNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How submissions are ranked/selected upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RankingMode {
    TopWeek,
    TopMonth,
    Hot,
}

impl RankingMode {
    /// "week" and "month" select the top listings; anything else falls back to hot.
    pub fn from_time_filter(filter: &str) -> Self {
        match filter.trim() {
            "week" => RankingMode::TopWeek,
            "month" => RankingMode::TopMonth,
            _ => RankingMode::Hot,
        }
    }

    /// Value of the `t` query parameter for top listings.
    pub fn time_param(self) -> Option<&'static str> {
        match self {
            RankingMode::TopWeek => Some("week"),
            RankingMode::TopMonth => Some("month"),
            RankingMode::Hot => None,
        }
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMode::TopWeek => f.write_str("top/week"),
            RankingMode::TopMonth => f.write_str("top/month"),
            RankingMode::Hot => f.write_str("hot"),
        }
    }
}

/// Lazy, ordered sequence of submissions. An `Err` item ends the community.
pub type SubmissionStream<'a> = Box<dyn Iterator<Item = Result<RawSubmission, SourceError>> + 'a>;

pub trait ContentSource {
    /// At most `limit` submissions of `community`, ranked by `mode`, in yield order.
    fn fetch(&self, community: &str, mode: RankingMode, limit: usize) -> Result<SubmissionStream<'_>, SourceError>;

    /// Directly available comments of `submission`, in source order.
    /// Never expands "load more" placeholders.
    fn comments(&self, submission: &RawSubmission) -> Result<Vec<RawComment>, SourceError>;
}
