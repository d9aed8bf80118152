//! Runs the selector over every configured community, strictly in order, and
//! concatenates the curated posts while tracking per-community yield.

use crate::model::CuratedPost;
use crate::observe::{NoopObserver, RunObserver};
use crate::selector::Selector;
use crate::source::{ContentSource, RankingMode, SourceError};
use ahash::AHashSet;
use serde::Serialize;

/// Yield of one community. `failed` communities always report `found == 0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommunityCount {
    pub community: String,
    pub found: usize,
    pub failed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AggregateReport {
    pub posts: Vec<CuratedPost>,
    pub counts: Vec<CommunityCount>,
}

impl AggregateReport {
    pub fn total(&self) -> usize {
        self.posts.len()
    }

    pub fn failed_communities(&self) -> impl Iterator<Item = &str> {
        self.counts.iter().filter(|c| c.failed).map(|c| c.community.as_str())
    }
}

static NOOP: NoopObserver = NoopObserver;

pub struct Aggregator<'a> {
    source: &'a dyn ContentSource,
    selector: Selector<'a>,
    mode: RankingMode,
    limit: usize,
    observer: &'a dyn RunObserver,
}

impl<'a> Aggregator<'a> {
    pub fn new(source: &'a dyn ContentSource, selector: Selector<'a>) -> Self {
        Self { source, selector, mode: RankingMode::Hot, limit: 100, observer: &NOOP }
    }

    pub fn mode(mut self, mode: RankingMode) -> Self { self.mode = mode; self }
    pub fn limit(mut self, limit: usize) -> Self { self.limit = limit; self }
    pub fn observer(mut self, observer: &'a dyn RunObserver) -> Self { self.observer = observer; self }

    /// Communities run one after another in the given order. A source error in
    /// one community discards whatever it had produced so far and the run
    /// continues with the next. Posts already emitted under the same id are skipped.
    pub fn run<S: AsRef<str>>(&self, communities: &[S]) -> AggregateReport {
        let mut report = AggregateReport::default();
        let mut seen: AHashSet<String> = AHashSet::new();

        for community in communities {
            let community = community.as_ref();
            self.observer.community_started(community, self.mode);

            match self.collect_community(community, &seen) {
                Ok(posts) => {
                    self.observer.community_finished(community, posts.len());
                    report.counts.push(CommunityCount { community: community.to_string(), found: posts.len(), failed: false });
                    seen.extend(posts.iter().map(|p| p.id.clone()));
                    report.posts.extend(posts);
                }
                Err(e) => {
                    self.observer.community_failed(community, &e);
                    report.counts.push(CommunityCount { community: community.to_string(), found: 0, failed: true });
                }
            }
        }

        report
    }

    fn collect_community(&self, community: &str, seen: &AHashSet<String>) -> Result<Vec<CuratedPost>, SourceError> {
        let stream = self.source.fetch(community, self.mode, self.limit)?;
        let mut posts = Vec::new();
        let mut local: AHashSet<String> = AHashSet::new();

        for item in stream {
            let sub = item?;
            if seen.contains(&sub.id) || local.contains(&sub.id) {
                self.observer.duplicate_skipped(community, &sub.id);
                continue;
            }
            match self.selector.decide(&sub, community, || self.source.comments(&sub))? {
                Ok(post) => {
                    local.insert(post.id.clone());
                    posts.push(post);
                }
                Err(verdict) => self.observer.submission_rejected(community, &sub.id, verdict),
            }
        }

        Ok(posts)
    }
}

/// Function form: aggregate `communities` with a fresh [`Aggregator`].
pub fn aggregate<S: AsRef<str>>(
    communities: &[S],
    source: &dyn ContentSource,
    selector: Selector<'_>,
    mode: RankingMode,
    limit: usize,
    observer: &dyn RunObserver,
) -> AggregateReport {
    Aggregator::new(source, selector).mode(mode).limit(limit).observer(observer).run(communities)
}
