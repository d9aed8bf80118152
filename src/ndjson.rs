use crate::util::{create_with_backoff, open_with_backoff, remove_with_backoff, replace_file_atomic_backoff, tmp_sibling};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Minimal NDJSON line reader over any buffered source (plain file or zstd decoder).
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path, 16, 50)?;
        Ok(Self::from_reader(Box::new(BufReader::with_capacity(buf_bytes.max(8 * 1024), f))))
    }

    pub fn from_reader(rdr: Box<dyn BufRead>) -> Self {
        Self { rdr }
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }
}

/// Buffered writer that goes to a temp sibling of the destination and is
/// promoted atomically by [`NdjsonWriter::finish_atomic`]. Dropping it without a
/// successful finish removes the temp file.
pub struct NdjsonWriter {
    // Field order matters: the file is closed before the guard removes it.
    w: BufWriter<File>,
    tmp: TmpGuard,
}

struct TmpGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TmpGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = remove_with_backoff(&self.path, 4, 25) {
                tracing::warn!(path = %self.path.display(), error = %e, "could not remove temp output");
            }
        }
    }
}

impl NdjsonWriter {
    pub fn create_for(dest: &Path, buf_bytes: usize) -> io::Result<Self> {
        let tmp = tmp_sibling(dest);
        let f = create_with_backoff(&tmp, 16, 50)?;
        Ok(Self { w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f), tmp: TmpGuard { path: tmp, armed: true } })
    }

    /// One compact JSON document followed by `\n`.
    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.w, record)?;
        self.w.write_all(b"\n")?;
        Ok(())
    }

    /// Raw access for formats that are not line-delimited JSON.
    pub fn inner(&mut self) -> &mut BufWriter<File> {
        &mut self.w
    }

    pub fn finish_atomic(self, final_path: &Path) -> Result<()> {
        let NdjsonWriter { mut w, mut tmp } = self;
        w.flush().with_context(|| format!("flush {}", tmp.path.display()))?;
        drop(w);
        replace_file_atomic_backoff(&tmp.path, final_path)?;
        tmp.armed = false;
        Ok(())
    }
}
