use crate::filters::FilterConfig;
use crate::keywords::KeywordSet;
use crate::sink::OutputFormat;
use crate::source::RankingMode;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Reddit application credentials.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub user_agent: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScrapeSettings {
    pub subreddits: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(default = "default_post_limit")]
    pub post_limit: usize,
    #[serde(default)]
    pub time_filter: String,          // "week", "month", anything else = hot
    #[serde(default)]
    pub source_dir: Option<PathBuf>,  // offline dumps instead of the API
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputSettings {
    pub format: String,
    pub filename: PathBuf,
    #[serde(default)]
    pub include_comments: bool,
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
    #[serde(default)]
    pub human_timestamps: bool,       // created_utc as RFC3339 string
    #[serde(default)]
    pub progress: bool,
}

/// Whole run configuration as read from `config.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct ScraperConfig {
    #[serde(default)]
    pub reddit_api: Option<ApiCredentials>,
    pub scraping: ScrapeSettings,
    pub output: OutputSettings,
    pub filters: FilterConfig,
}

fn default_post_limit() -> usize { 100 }
fn default_max_comments() -> usize { 5 }

fn env_nonempty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl ScraperConfig {
    /// Read, parse, apply env overrides and validate. Every failure here is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Configuration file not found: {}", path.display());
        }
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg = Self::from_json_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Parse with `REDDIT_*` env overrides applied, as [`ScraperConfig::load`] does.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::parse(raw, true)
    }

    /// Parse exactly what the file says; the process environment is ignored.
    pub fn from_json_str_without_env(raw: &str) -> Result<Self> {
        Self::parse(raw, false)
    }

    fn parse(raw: &str, env_overrides: bool) -> Result<Self> {
        let mut cfg: ScraperConfig = serde_json::from_str(raw)?;
        if env_overrides {
            cfg.apply_env_overrides();
        }
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET / REDDIT_USER_AGENT replace file values.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_nonempty("REDDIT_CLIENT_ID") {
            self.reddit_api.get_or_insert_with(ApiCredentials::default).client_id = v;
        }
        if let Some(v) = env_nonempty("REDDIT_CLIENT_SECRET") {
            self.reddit_api.get_or_insert_with(ApiCredentials::default).client_secret = v;
        }
        if let Some(v) = env_nonempty("REDDIT_USER_AGENT") {
            self.reddit_api.get_or_insert_with(ApiCredentials::default).user_agent = v;
        }
    }

    /// Trim subreddit names and strip a leading "r/"; case is preserved for output.
    fn normalize(&mut self) {
        for s in self.scraping.subreddits.iter_mut() {
            let t = s.trim();
            *s = t.strip_prefix("r/").unwrap_or(t).to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scraping.subreddits.is_empty() {
            bail!("scraping.subreddits must list at least one community");
        }
        if self.scraping.subreddits.iter().any(|s| s.is_empty()) {
            bail!("scraping.subreddits contains an empty name");
        }
        KeywordSet::new(&self.scraping.keywords).context("scraping.keywords")?;
        self.output_format()?;
        if self.scraping.source_dir.is_none() {
            match &self.reddit_api {
                Some(api) if !api.client_id.is_empty() && !api.client_secret.is_empty() && !api.user_agent.is_empty() => {}
                _ => bail!("reddit_api.client_id, client_secret and user_agent are required unless scraping.source_dir is set"),
            }
        }
        Ok(())
    }

    pub fn keyword_set(&self) -> Result<KeywordSet> {
        KeywordSet::new(&self.scraping.keywords)
    }

    pub fn ranking_mode(&self) -> RankingMode {
        RankingMode::from_time_filter(&self.scraping.time_filter)
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output.format.parse()
    }

    pub fn with_subreddits<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scraping.subreddits = iter.into_iter().map(Into::into).collect();
        self.normalize();
        self
    }
    pub fn with_source_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.scraping.source_dir = Some(dir.as_ref().to_path_buf());
        self
    }
    pub fn with_output_file(mut self, path: impl AsRef<Path>) -> Self {
        self.output.filename = path.as_ref().to_path_buf();
        self
    }
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.output.format = format.into();
        self
    }
    pub fn with_comments(mut self, include: bool, max_comments: usize) -> Self {
        self.output.include_comments = include;
        self.output.max_comments = max_comments;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.output.progress = yes;
        self
    }
}
