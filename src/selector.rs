//! Per-submission accept/reject/enrich decision.

use crate::comments::extract;
use crate::filters::{FilterConfig, Rejection};
use crate::keywords::KeywordSet;
use crate::model::{full_permalink, resolve_author, CuratedComment, CuratedPost, RawComment, RawSubmission};
use crate::source::SourceError;

/// Why a submission was left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    NoKeyword,
    Filtered(Rejection),
}

/// Composes keyword matching, quality filtering and comment extraction.
/// Borrows the run configuration; never mutates it.
#[derive(Clone, Copy, Debug)]
pub struct Selector<'a> {
    keywords: &'a KeywordSet,
    filters: &'a FilterConfig,
    include_comments: bool,
    max_comments: usize,
}

impl<'a> Selector<'a> {
    pub fn new(keywords: &'a KeywordSet, filters: &'a FilterConfig) -> Self {
        Self { keywords, filters, include_comments: false, max_comments: 0 }
    }

    pub fn with_comments(mut self, include: bool, max_comments: usize) -> Self {
        self.include_comments = include;
        self.max_comments = max_comments;
        self
    }

    pub fn include_comments(&self) -> bool {
        self.include_comments
    }

    /// Keyword stage then quality stage. `Ok(())` means the submission is curated.
    pub fn judge(&self, sub: &RawSubmission) -> Result<(), Verdict> {
        if !(self.keywords.matches(&sub.title) || self.keywords.matches(&sub.selftext)) {
            return Err(Verdict::NoKeyword);
        }
        match self.filters.rejection(sub) {
            Some(r) => Err(Verdict::Filtered(r)),
            None => Ok(()),
        }
    }

    /// `load_comments` runs only for accepted submissions and only when comments are enabled.
    pub fn select<F>(&self, sub: &RawSubmission, community: &str, load_comments: F) -> Result<Option<CuratedPost>, SourceError>
    where
        F: FnOnce() -> Result<Vec<RawComment>, SourceError>,
    {
        Ok(self.decide(sub, community, load_comments)?.ok())
    }

    /// Like [`Selector::select`], but reports why a submission was left out.
    pub fn decide<F>(&self, sub: &RawSubmission, community: &str, load_comments: F) -> Result<Result<CuratedPost, Verdict>, SourceError>
    where
        F: FnOnce() -> Result<Vec<RawComment>, SourceError>,
    {
        if let Err(v) = self.judge(sub) {
            return Ok(Err(v));
        }
        let comments = if self.include_comments {
            Some(extract(load_comments()?, self.max_comments))
        } else {
            None
        };
        Ok(Ok(curate(sub, community, comments)))
    }
}

fn curate(sub: &RawSubmission, community: &str, comments: Option<Vec<CuratedComment>>) -> CuratedPost {
    CuratedPost {
        id: sub.id.clone(),
        title: sub.title.clone(),
        selftext: sub.selftext.clone(),
        score: sub.score,
        num_comments: sub.num_comments,
        created_utc: sub.created_utc,
        subreddit: community.to_string(),
        url: sub.url.clone(),
        permalink: full_permalink(&sub.permalink),
        author: resolve_author(sub.author.as_deref()),
        comments,
    }
}
