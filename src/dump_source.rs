//! Offline content source over per-community NDJSON dumps (plain or zstd).

use crate::date::window_secs;
use crate::model::{RawComment, RawSubmission};
use crate::ndjson::NdjsonReader;
use crate::paths::discover_dumps;
use crate::source::{ContentSource, RankingMode, SourceError, SubmissionStream};
use crate::zstd_jsonl::{open_dump, parse_record};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

const READ_BUF: usize = 256 * 1024;
const WEEK_DAYS: u32 = 7;
const MONTH_DAYS: u32 = 31;

/// Reads `<community>.jsonl[.zst]` files from one directory.
///
/// Ranking is emulated over the snapshot: `Hot` keeps file order; the top modes keep
/// records created within 7 / 31 days of the newest record in the dump and order
/// them by score, highest first (ties keep file order).
pub struct DumpSource {
    dir: PathBuf,
    dumps: BTreeMap<String, PathBuf>,
    // Comments embedded in the records yielded so far, keyed by submission id.
    comments: RefCell<HashMap<String, Vec<RawComment>>>,
}

impl DumpSource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("dump directory not found: {}", dir.display()),
            )));
        }
        let dumps = discover_dumps(dir);
        tracing::info!("Discovered {} community dumps in {}", dumps.len(), dir.display());
        Ok(Self { dir: dir.to_path_buf(), dumps, comments: RefCell::new(HashMap::new()) })
    }

    pub fn communities(&self) -> impl Iterator<Item = &str> {
        self.dumps.keys().map(String::as_str)
    }

    fn dump_for(&self, community: &str) -> Result<&PathBuf, SourceError> {
        self.dumps
            .get(&community.to_lowercase())
            .ok_or_else(|| SourceError::CommunityNotFound(format!("{} (no dump in {})", community, self.dir.display())))
    }

    fn remember(&self, id: &str, comments: Vec<RawComment>) {
        self.comments.borrow_mut().insert(id.to_string(), comments);
    }
}

/// Lazily parses one dump; malformed lines are skipped with a warning.
struct DumpLines {
    reader: NdjsonReader,
    path: PathBuf,
    buf: String,
    line_no: u64,
}

impl Iterator for DumpLines {
    type Item = Result<(RawSubmission, Vec<RawComment>), SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(SourceError::Io(e))),
            }
            self.line_no += 1;
            if self.buf.trim().is_empty() {
                continue;
            }
            match parse_record(&self.buf) {
                Ok(rec) => return Some(Ok(rec.into_parts())),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), line = self.line_no, error = %e, "skipping malformed record");
                }
            }
        }
    }
}

impl ContentSource for DumpSource {
    fn fetch(&self, community: &str, mode: RankingMode, limit: usize) -> Result<SubmissionStream<'_>, SourceError> {
        let path = self.dump_for(community)?;
        let lines = DumpLines { reader: open_dump(path, READ_BUF)?, path: path.clone(), buf: String::new(), line_no: 0 };

        let days = match mode {
            RankingMode::Hot => {
                let stream = lines.take(limit).map(move |item| {
                    item.map(|(sub, comments)| {
                        self.remember(&sub.id, comments);
                        sub
                    })
                });
                return Ok(Box::new(stream));
            }
            RankingMode::TopWeek => WEEK_DAYS,
            RankingMode::TopMonth => MONTH_DAYS,
        };

        // Top modes need the whole snapshot before anything can be yielded.
        let all: Vec<(RawSubmission, Vec<RawComment>)> = lines.collect::<Result<_, _>>()?;
        let newest = all.iter().map(|(s, _)| s.created_utc).fold(f64::NEG_INFINITY, f64::max);
        let cutoff = newest - window_secs(days);
        let mut ranked: Vec<_> = all.into_iter().filter(|(s, _)| s.created_utc >= cutoff).collect();
        ranked.sort_by(|a, b| b.0.score.cmp(&a.0.score));
        ranked.truncate(limit);

        let stream = ranked.into_iter().map(move |(sub, comments)| {
            self.remember(&sub.id, comments);
            Ok::<_, SourceError>(sub)
        });
        Ok(Box::new(stream))
    }

    fn comments(&self, submission: &RawSubmission) -> Result<Vec<RawComment>, SourceError> {
        Ok(self.comments.borrow().get(&submission.id).cloned().unwrap_or_default())
    }
}
