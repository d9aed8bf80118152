#![allow(dead_code)]

use frustration_scraper::{
    ContentSource, FilterConfig, KeywordSet, RankingMode, RawComment, RawSubmission, RunObserver, SourceError,
    SubmissionStream, Verdict,
};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The stock frustration keyword list.
pub fn frustration_keywords() -> KeywordSet {
    KeywordSet::new(["frustrat", "annoying", "irritat"]).unwrap()
}

/// `{min_score:1, min_comments:0, exclude_nsfw:true, exclude_deleted:true}`
pub fn default_filters() -> FilterConfig {
    FilterConfig { min_score: 1, min_comments: 0, exclude_nsfw: true, exclude_deleted: true }
}

/// A clean, passing submission with a keyword in the title. Tweak fields per test.
pub fn submission(id: &str, title: &str) -> RawSubmission {
    RawSubmission {
        id: id.to_string(),
        title: title.to_string(),
        selftext: String::new(),
        score: 10,
        num_comments: 5,
        created_utc: 1_234_567_890.0,
        over_18: false,
        author: Some("test_user".to_string()),
        url: format!("https://reddit.com/{}", id),
        permalink: format!("/r/test/comments/{}", id),
    }
}

pub fn comment(id: &str, body: Option<&str>, author: Option<&str>) -> RawComment {
    RawComment { id: id.to_string(), body: body.map(str::to_string), score: 1, author: author.map(str::to_string) }
}

/// In-memory source. Communities map to either a list of submissions or a failure.
/// A `fail_after` entry makes the stream error after yielding that many items.
#[derive(Default)]
pub struct MemorySource {
    pub communities: HashMap<String, Vec<RawSubmission>>,
    pub failing: HashMap<String, String>,
    pub fail_after: HashMap<String, usize>,
    pub comments: HashMap<String, Vec<RawComment>>,
    pub failing_comments: Vec<String>,
    pub fetch_calls: RefCell<Vec<(String, RankingMode, usize)>>,
    pub comment_calls: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_community(mut self, name: &str, subs: Vec<RawSubmission>) -> Self {
        self.communities.insert(name.to_string(), subs);
        self
    }

    pub fn with_failure(mut self, name: &str, reason: &str) -> Self {
        self.failing.insert(name.to_string(), reason.to_string());
        self
    }

    pub fn with_failure_after(mut self, name: &str, n: usize) -> Self {
        self.fail_after.insert(name.to_string(), n);
        self
    }

    pub fn with_comments(mut self, submission_id: &str, comments: Vec<RawComment>) -> Self {
        self.comments.insert(submission_id.to_string(), comments);
        self
    }

    pub fn with_failing_comments(mut self, submission_id: &str) -> Self {
        self.failing_comments.push(submission_id.to_string());
        self
    }
}

impl ContentSource for MemorySource {
    fn fetch(&self, community: &str, mode: RankingMode, limit: usize) -> Result<SubmissionStream<'_>, SourceError> {
        self.fetch_calls.borrow_mut().push((community.to_string(), mode, limit));
        if let Some(reason) = self.failing.get(community) {
            return Err(SourceError::Status { endpoint: format!("/r/{}/{}", community, reason), status: 503 });
        }
        let subs = self.communities.get(community).cloned().unwrap_or_default();
        let mut items: Vec<Result<RawSubmission, SourceError>> = subs.into_iter().take(limit).map(Ok).collect();
        if let Some(&n) = self.fail_after.get(community) {
            items.truncate(n);
            items.push(Err(SourceError::Decode("truncated listing".to_string())));
        }
        Ok(Box::new(items.into_iter()))
    }

    fn comments(&self, submission: &RawSubmission) -> Result<Vec<RawComment>, SourceError> {
        self.comment_calls.set(self.comment_calls.get() + 1);
        if self.failing_comments.contains(&submission.id) {
            return Err(SourceError::Status { endpoint: format!("/comments/{}", submission.id), status: 500 });
        }
        Ok(self.comments.get(&submission.id).cloned().unwrap_or_default())
    }
}

/// Observer that records events as strings, in order.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<String>>,
}

impl RunObserver for RecordingObserver {
    fn community_started(&self, community: &str, mode: RankingMode) {
        self.events.borrow_mut().push(format!("start {} {}", community, mode));
    }
    fn submission_rejected(&self, community: &str, id: &str, verdict: Verdict) {
        self.events.borrow_mut().push(format!("reject {} {} {:?}", community, id, verdict));
    }
    fn duplicate_skipped(&self, community: &str, id: &str) {
        self.events.borrow_mut().push(format!("dup {} {}", community, id));
    }
    fn community_finished(&self, community: &str, found: usize) {
        self.events.borrow_mut().push(format!("done {} {}", community, found));
    }
    fn community_failed(&self, community: &str, _error: &SourceError) {
        self.events.borrow_mut().push(format!("failed {}", community));
    }
}

/// A dumped Reddit submission object, as it would appear on one NDJSON line.
pub fn dump_line(id: &str, title: &str, score: i64, created_utc: f64) -> Value {
    json!({
        "id": id, "title": title, "selftext": "", "score": score, "num_comments": 3,
        "created_utc": created_utc, "over_18": false, "author": "bob",
        "url": format!("https://example.com/{}", id),
        "permalink": format!("/r/test/comments/{}/x/", id),
        "subreddit": "test", "domain": "example.com"
    })
}

pub fn write_jsonl(path: &Path, lines: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Same content as `write_jsonl`, zstd-compressed.
pub fn write_zst_lines(path: &Path, lines: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Dump directory with:
/// - `rust.jsonl`: f1 (frustrating, kept), h1 (happy, no keyword), n1 (annoying but nsfw),
///   z1 (irritating but score 0), c1 (frustrated, with three embedded comments).
/// - `golang.zst`: g1 (annoying, kept), g2 (irritated, deleted body, dropped).
pub fn make_dump_dir() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();

    let mut n1 = dump_line("n1", "Annoying NSFW thing", 50, 1_700_000_100.0);
    n1["over_18"] = json!(true);
    let mut z1 = dump_line("z1", "Irritating but ignored", 0, 1_700_000_200.0);
    z1["author"] = json!("[deleted]");
    let mut c1 = dump_line("c1", "So frustrated with lifetimes", 7, 1_700_000_300.0);
    c1["comments"] = json!([
        {"id": "k1", "body": "same here", "score": 4, "author": "alice"},
        {"id": "k2", "score": 0, "author": null},
        {"id": "k3", "body": "[removed]", "score": 1, "author": "[deleted]"}
    ]);
    write_jsonl(
        &base.join("rust.jsonl"),
        &[
            dump_line("f1", "This is frustrating", 10, 1_700_000_000.0),
            dump_line("h1", "Happy post", 5, 1_700_000_050.0),
            n1,
            z1,
            c1,
        ],
    );

    let mut g2 = dump_line("g2", "Irritated", 3, 1_700_000_000.0);
    g2["selftext"] = json!("[deleted]");
    write_zst_lines(&base.join("golang.zst"), &[dump_line("g1", "Annoying error handling", 12, 1_700_000_000.0), g2]);

    base
}

/// Config JSON pointing at a dump directory.
pub fn dump_config_json(source_dir: &Path, out_file: &Path, subreddits: &[&str]) -> String {
    json!({
        "scraping": {
            "subreddits": subreddits,
            "keywords": ["frustrat", "annoying", "irritat"],
            "post_limit": 10,
            "time_filter": "hot",
            "source_dir": source_dir
        },
        "output": {
            "format": "json",
            "filename": out_file,
            "include_comments": false,
            "max_comments": 5
        },
        "filters": {"min_score": 1, "min_comments": 0, "exclude_nsfw": true, "exclude_deleted": true}
    })
    .to_string()
}

/// Read a text file line-by-line into strings (useful for .jsonl, .csv).
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().filter(|s| !s.is_empty()).map(str::to_string).collect()
}
