//! Progress reporting: a count-style bar over communities.

use crate::observe::RunObserver;
use crate::selector::Verdict;
use crate::source::{RankingMode, SourceError};
use indicatif::{ProgressBar, ProgressStyle};

/// Count-style progress bar (items processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Ticks a bar once per finished (or failed) community and forwards every event to `inner`.
pub struct ProgressObserver<O> {
    pb: ProgressBar,
    inner: O,
}

impl<O: RunObserver> ProgressObserver<O> {
    pub fn new(total_communities: usize, inner: O) -> Self {
        Self { pb: make_count_progress(total_communities as u64, "Communities"), inner }
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("done");
    }
}

impl<O: RunObserver> RunObserver for ProgressObserver<O> {
    fn community_started(&self, community: &str, mode: RankingMode) {
        self.pb.set_message(format!("r/{}", community));
        self.pb.suspend(|| self.inner.community_started(community, mode));
    }

    fn submission_rejected(&self, community: &str, id: &str, verdict: Verdict) {
        self.inner.submission_rejected(community, id, verdict);
    }

    fn duplicate_skipped(&self, community: &str, id: &str) {
        self.inner.duplicate_skipped(community, id);
    }

    fn community_finished(&self, community: &str, found: usize) {
        self.pb.suspend(|| self.inner.community_finished(community, found));
        self.pb.inc(1);
    }

    fn community_failed(&self, community: &str, error: &SourceError) {
        self.pb.suspend(|| self.inner.community_failed(community, error));
        self.pb.inc(1);
    }
}
