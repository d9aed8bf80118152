mod config;
mod date;
mod paths;
mod zstd_jsonl;
mod ndjson;
mod util;

mod model;
mod keywords;
mod filters;
mod comments;
mod selector;

mod source;
mod dump_source;
mod reddit_api;

mod observe;
mod progress;
mod aggregate;
mod sink;
mod pipeline;

pub use crate::config::{ApiCredentials, OutputSettings, ScrapeSettings, ScraperConfig, DEFAULT_CONFIG_PATH};
pub use crate::model::{CuratedComment, CuratedPost, RawComment, RawSubmission, DELETED, SITE_ORIGIN};
pub use crate::pipeline::{FrustrationScraper, RunSummary};

// Decision functions: keyword matcher, quality filter, comment extractor, selector.
pub use crate::keywords::{matches, KeywordSet};
pub use crate::filters::{passes, FilterConfig, Rejection};
pub use crate::comments::extract;
pub use crate::selector::{Selector, Verdict};

// Content source boundary and implementations.
pub use crate::source::{ContentSource, RankingMode, SourceError, SubmissionStream};
pub use crate::dump_source::DumpSource;
pub use crate::reddit_api::RedditApiSource;
pub use crate::paths::community_of;

// Aggregation and observability.
pub use crate::aggregate::{aggregate, AggregateReport, Aggregator, CommunityCount};
pub use crate::observe::{NoopObserver, RunObserver, TracingObserver};
pub use crate::progress::{make_count_progress, ProgressObserver};

// Sink.
pub use crate::sink::{csv_escape, read_posts_json, resolve_destination, write_posts, OutputFormat, SinkOptions};
pub use crate::date::rfc3339_from_epoch;
pub use crate::util::init_tracing_once;
