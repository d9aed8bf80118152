use crate::model::{RawComment, RawSubmission, DELETED};
use crate::ndjson::NdjsonReader;
use crate::util::open_with_backoff;
use anyhow::Result;
use serde::Deserialize;
use std::io::{self, BufReader};
use std::path::Path;
use zstd::stream::read::Decoder;

/// Line-level schema of a dumped Reddit submission. Extra fields are ignored by serde;
/// missing ones default so partially populated dumps still load.
#[derive(Debug, Deserialize)]
pub struct DumpRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub over_18: bool,
    pub author: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub comments: Vec<DumpComment>,
}

#[derive(Debug, Deserialize)]
pub struct DumpComment {
    #[serde(default)]
    pub id: String,
    pub body: Option<String>,
    #[serde(default)]
    pub score: i64,
    pub author: Option<String>,
}

/// Wire author to model author: the `"[deleted]"` marker and empty names mean "no author".
pub fn author_from_wire(author: Option<String>) -> Option<String> {
    author.filter(|a| !a.is_empty() && a != DELETED)
}

impl DumpRecord {
    /// Split into the submission and its embedded comment thread.
    pub fn into_parts(self) -> (RawSubmission, Vec<RawComment>) {
        let comments = self
            .comments
            .into_iter()
            .map(|c| RawComment { id: c.id, body: c.body, score: c.score, author: author_from_wire(c.author) })
            .collect();
        let sub = RawSubmission {
            id: self.id,
            title: self.title,
            selftext: self.selftext,
            score: self.score,
            num_comments: self.num_comments,
            created_utc: self.created_utc,
            over_18: self.over_18,
            author: author_from_wire(self.author),
            url: self.url,
            permalink: self.permalink,
        };
        (sub, comments)
    }
}

#[inline]
pub fn parse_record(line: &str) -> Result<DumpRecord> {
    Ok(serde_json::from_str(line)?)
}

pub fn is_zst(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("zst")).unwrap_or(false)
}

/// Open a dump for line reading, decompressing `.zst` transparently.
///
/// We request `window_log_max(31)` up front to avoid "Frame requires too much memory"
/// on dumps produced with long-distance matching.
pub fn open_dump(path: &Path, read_buf_bytes: usize) -> io::Result<NdjsonReader> {
    if !is_zst(path) {
        return NdjsonReader::open(path, read_buf_bytes);
    }
    let file = open_with_backoff(path, 16, 50)?;
    let mut decoder = Decoder::new(file)?;
    decoder.window_log_max(31)?;
    let reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder);
    Ok(NdjsonReader::from_reader(Box::new(reader)))
}
