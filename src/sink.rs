//! Output sink: serializes the curated corpus once, at the end of a run.
//! Writes go to a temp sibling that is atomically promoted, so an interrupted
//! run never leaves a half-written destination.

use crate::date::rfc3339_from_epoch;
use crate::model::CuratedPost;
use crate::ndjson::NdjsonWriter;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const WRITE_BUF: usize = 256 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty JSON array, comments nested.
    Json,
    /// One JSON object per line.
    Jsonl,
    /// One row per post; nested comments become a JSON string column.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            other => bail!("unsupported output format: {:?} (expected json, jsonl or csv)", other),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SinkOptions {
    pub human_timestamps: bool,
}

/// Where `format` actually lands: csv output swaps a `.json` extension for `.csv`.
pub fn resolve_destination(filename: &Path, format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Csv if filename.extension().map(|e| e == "json").unwrap_or(false) => filename.with_extension("csv"),
        _ => filename.to_path_buf(),
    }
}

/// Write `posts` to `filename` in `format`. Returns the path written.
pub fn write_posts(posts: &[CuratedPost], filename: &Path, format: OutputFormat, opts: SinkOptions) -> Result<PathBuf> {
    let dest = resolve_destination(filename, format);
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let mut w = NdjsonWriter::create_for(&dest, WRITE_BUF).with_context(|| format!("create output for {}", dest.display()))?;
    match format {
        OutputFormat::Json => {
            let records = to_records(posts, opts)?;
            serde_json::to_writer_pretty(w.inner(), &records)?;
            w.inner().write_all(b"\n")?;
        }
        OutputFormat::Jsonl => {
            for rec in to_records(posts, opts)? {
                w.write_record(&rec)?;
            }
        }
        OutputFormat::Csv => write_csv(w.inner(), posts, opts)?,
    }
    w.finish_atomic(&dest)?;

    tracing::info!("Saved {} posts to {}", posts.len(), dest.display());
    Ok(dest)
}

/// Read back a file written with [`OutputFormat::Json`] (default timestamps).
pub fn read_posts_json(path: &Path) -> Result<Vec<CuratedPost>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let posts = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))?;
    Ok(posts)
}

fn to_records(posts: &[CuratedPost], opts: SinkOptions) -> Result<Vec<Value>> {
    posts
        .iter()
        .map(|p| {
            let mut v = serde_json::to_value(p)?;
            if opts.human_timestamps {
                if let Some(obj) = v.as_object_mut() {
                    obj.insert("created_utc".into(), Value::String(rfc3339_from_epoch(p.created_utc)));
                }
            }
            Ok(v)
        })
        .collect()
}

const CSV_COLUMNS: [&str; 10] = [
    "id", "title", "selftext", "score", "num_comments", "created_utc", "subreddit", "url", "permalink", "author",
];

fn write_csv<W: Write>(w: &mut W, posts: &[CuratedPost], opts: SinkOptions) -> Result<()> {
    let with_comments = posts.iter().any(|p| p.comments.is_some());
    let mut header: Vec<&str> = CSV_COLUMNS.to_vec();
    if with_comments {
        header.push("comments");
    }
    write_csv_row(w, header.iter().map(|s| s.to_string()))?;

    for p in posts {
        let created = if opts.human_timestamps { rfc3339_from_epoch(p.created_utc) } else { p.created_utc.to_string() };
        let mut row = vec![
            p.id.clone(),
            p.title.clone(),
            p.selftext.clone(),
            p.score.to_string(),
            p.num_comments.to_string(),
            created,
            p.subreddit.clone(),
            p.url.clone(),
            p.permalink.clone(),
            p.author.clone(),
        ];
        if with_comments {
            let cell = match &p.comments {
                Some(c) => serde_json::to_string(c).map_err(|e| anyhow!("encode comments of {}: {}", p.id, e))?,
                None => String::new(),
            };
            row.push(cell);
        }
        write_csv_row(w, row.into_iter())?;
    }
    Ok(())
}

fn write_csv_row<W: Write>(w: &mut W, cells: impl Iterator<Item = String>) -> Result<()> {
    let mut first = true;
    for cell in cells {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        w.write_all(csv_escape(&cell).as_bytes())?;
    }
    w.write_all(b"\n")?;
    Ok(())
}

/// RFC 4180 quoting: wrap in quotes when the cell holds a comma, quote, or line break.
pub fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
