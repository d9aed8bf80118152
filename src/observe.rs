//! Injected observability for a run. The aggregator reports through a
//! `RunObserver` instead of logging directly.

use crate::selector::Verdict;
use crate::source::{RankingMode, SourceError};

pub trait RunObserver {
    fn community_started(&self, _community: &str, _mode: RankingMode) {}
    fn submission_rejected(&self, _community: &str, _id: &str, _verdict: Verdict) {}
    fn duplicate_skipped(&self, _community: &str, _id: &str) {}
    fn community_finished(&self, _community: &str, _found: usize) {}
    fn community_failed(&self, _community: &str, _error: &SourceError) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Emits `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn community_started(&self, community: &str, mode: RankingMode) {
        tracing::info!(%mode, "Scraping r/{}", community);
    }

    fn submission_rejected(&self, community: &str, id: &str, verdict: Verdict) {
        tracing::debug!(community, id, ?verdict, "submission rejected");
    }

    fn duplicate_skipped(&self, community: &str, id: &str) {
        tracing::debug!(community, id, "duplicate submission skipped");
    }

    fn community_finished(&self, community: &str, found: usize) {
        tracing::info!("Found {} frustration posts in r/{}", found, community);
    }

    fn community_failed(&self, community: &str, error: &SourceError) {
        tracing::error!(error = %error, "Error scraping r/{}", community);
    }
}
