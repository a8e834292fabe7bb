use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

/// Append-only destination for rendered report text.
///
/// Each call receives one complete fragment; implementations must not split
/// or reorder it.
pub trait ReportSink {
    fn append(&mut self, fragment: &str) -> Result<()>;
}

/// Appends to a report file, creating it on first use.
///
/// The file is reopened for every fragment and flushed before returning, so
/// the text is handed to the OS by the time `append` returns. It is not
/// fsynced.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn append(&mut self, fragment: &str) -> Result<()> {
        append_to_file(&self.path, fragment.as_bytes())
    }
}

/// Open `path` in append mode, write `bytes` in one call and flush
pub(crate) fn append_to_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let wrap = |source| ReportError::SinkWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    file.write_all(bytes).map_err(wrap)?;
    file.flush().map_err(wrap)
}

/// Collects report text in memory
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ReportSink for BufferSink {
    fn append(&mut self, fragment: &str) -> Result<()> {
        self.buffer.push_str(fragment);
        Ok(())
    }
}
