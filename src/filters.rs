//! Quality thresholds applied to submissions that already carry a keyword hit.

use crate::model::{RawSubmission, DELETED};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score/engagement/content-policy thresholds. Loaded once, shared read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub min_score: i64,
    pub min_comments: u64,
    pub exclude_nsfw: bool,
    pub exclude_deleted: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { min_score: 1, min_comments: 0, exclude_nsfw: true, exclude_deleted: true }
    }
}

/// The first threshold a submission failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    LowScore,
    FewComments,
    Nsfw,
    DeletedBody,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::LowScore => "score below minimum",
            Rejection::FewComments => "too few comments",
            Rejection::Nsfw => "flagged over_18",
            Rejection::DeletedBody => "body removed",
        };
        f.write_str(s)
    }
}

impl FilterConfig {
    /// Cheapest checks first: score, comments, then the flags.
    pub fn rejection(&self, sub: &RawSubmission) -> Option<Rejection> {
        if sub.score < self.min_score {
            return Some(Rejection::LowScore);
        }
        if sub.num_comments < self.min_comments {
            return Some(Rejection::FewComments);
        }
        if self.exclude_nsfw && sub.over_18 {
            return Some(Rejection::Nsfw);
        }
        if self.exclude_deleted && sub.selftext == DELETED {
            return Some(Rejection::DeletedBody);
        }
        None
    }

    #[inline]
    pub fn passes(&self, sub: &RawSubmission) -> bool {
        self.rejection(sub).is_none()
    }
}

/// Free-function form of [`FilterConfig::passes`].
#[inline]
pub fn passes(sub: &RawSubmission, config: &FilterConfig) -> bool {
    config.passes(sub)
}
