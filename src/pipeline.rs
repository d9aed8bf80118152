use crate::aggregate::{AggregateReport, Aggregator};
use crate::config::ScraperConfig;
use crate::dump_source::DumpSource;
use crate::keywords::KeywordSet;
use crate::observe::{RunObserver, TracingObserver};
use crate::progress::ProgressObserver;
use crate::reddit_api::RedditApiSource;
use crate::selector::Selector;
use crate::sink::{write_posts, SinkOptions};
use crate::source::ContentSource;
use anyhow::{anyhow, Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// One configured scraping run: source → selector → aggregator → sink.
pub struct FrustrationScraper {
    config: ScraperConfig,
    keywords: KeywordSet,
}

/// What a run produced. `output` is None when nothing matched (no file is written).
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub report: AggregateReport,
    pub output: Option<PathBuf>,
}

impl FrustrationScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let keywords = config.keyword_set().context("scraping.keywords")?;
        Ok(Self { config, keywords })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(ScraperConfig::load(path)?)
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Offline dumps when `scraping.source_dir` is set, otherwise the Reddit API.
    /// Authentication happens here, before any fetching.
    pub fn open_source(&self) -> Result<Box<dyn ContentSource>> {
        if let Some(dir) = &self.config.scraping.source_dir {
            let src = DumpSource::open(dir).with_context(|| format!("open dump directory {}", dir.display()))?;
            return Ok(Box::new(src));
        }
        let creds = self.config.reddit_api.as_ref().ok_or_else(|| anyhow!("reddit_api credentials are missing"))?;
        let src = RedditApiSource::connect(creds).map_err(|e| anyhow!("Reddit API authentication failed: {}", e))?;
        Ok(Box::new(src))
    }

    pub fn selector(&self) -> Selector<'_> {
        Selector::new(&self.keywords, &self.config.filters)
            .with_comments(self.config.output.include_comments, self.config.output.max_comments)
    }

    /// Aggregate every configured community from `source`.
    pub fn scrape(&self, source: &dyn ContentSource, observer: &dyn RunObserver) -> AggregateReport {
        Aggregator::new(source, self.selector())
            .mode(self.config.ranking_mode())
            .limit(self.config.scraping.post_limit)
            .observer(observer)
            .run(self.config.scraping.subreddits.as_slice())
    }

    /// Serialize `report` through the sink. Nothing is written for an empty report.
    pub fn save(&self, report: &AggregateReport) -> Result<Option<PathBuf>> {
        if report.posts.is_empty() {
            tracing::warn!("No posts found matching criteria");
            return Ok(None);
        }
        let format = self.config.output_format()?;
        let opts = SinkOptions { human_timestamps: self.config.output.human_timestamps };
        let path = write_posts(&report.posts, &self.config.output.filename, format, opts)?;
        Ok(Some(path))
    }

    pub fn run_with(&self, source: &dyn ContentSource, observer: &dyn RunObserver) -> Result<RunSummary> {
        tracing::info!("Starting Reddit frustration scraper");
        let report = self.scrape(source, observer);
        let output = self.save(&report)?;
        Ok(RunSummary { report, output })
    }

    /// Full run with the configured source and tracing (plus an optional progress bar).
    pub fn run(&self) -> Result<RunSummary> {
        let source = self.open_source()?;
        if self.config.output.progress {
            let observer = ProgressObserver::new(self.config.scraping.subreddits.len(), TracingObserver);
            let summary = self.run_with(source.as_ref(), &observer);
            observer.finish();
            summary
        } else {
            self.run_with(source.as_ref(), &TracingObserver)
        }
    }
}

impl RunSummary {
    /// Human-readable summary printed by the binary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n=== Scraping Complete ===");
        let _ = writeln!(out, "Total posts found: {}", self.report.total());
        let names: Vec<&str> = self.report.counts.iter().map(|c| c.community.as_str()).collect();
        let _ = writeln!(out, "Subreddits scraped: {}", names.join(", "));
        for c in &self.report.counts {
            if c.failed {
                let _ = writeln!(out, "  r/{}: failed", c.community);
            } else {
                let _ = writeln!(out, "  r/{}: {}", c.community, c.found);
            }
        }
        match &self.output {
            Some(p) => { let _ = writeln!(out, "Data saved to: {}", p.display()); }
            None => { let _ = writeln!(out, "No data saved (no posts matched)"); }
        }
        out
    }
}
