use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::report::record::{path_id, VulnerabilityRecord};
use crate::report::sink::append_to_file;

/// Secondary, machine-readable channel fed alongside the text report.
///
/// Calls arrive 1:1 with text report events and in the same order.
pub trait StructuredSink {
    fn write_start(&mut self, target: &str) -> Result<()>;
    fn write_end(&mut self, elapsed: Duration) -> Result<()>;
    fn write_vulnerability(&mut self, record: &VulnerabilityRecord) -> Result<()>;
    fn write_stored_vulnerability(&mut self, path: &[VulnerabilityRecord]) -> Result<()>;
}

impl<S: StructuredSink + ?Sized> StructuredSink for Box<S> {
    fn write_start(&mut self, target: &str) -> Result<()> {
        (**self).write_start(target)
    }

    fn write_end(&mut self, elapsed: Duration) -> Result<()> {
        (**self).write_end(elapsed)
    }

    fn write_vulnerability(&mut self, record: &VulnerabilityRecord) -> Result<()> {
        (**self).write_vulnerability(record)
    }

    fn write_stored_vulnerability(&mut self, path: &[VulnerabilityRecord]) -> Result<()> {
        (**self).write_stored_vulnerability(path)
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStructuredSink;

impl StructuredSink for NullStructuredSink {
    fn write_start(&mut self, _target: &str) -> Result<()> {
        Ok(())
    }

    fn write_end(&mut self, _elapsed: Duration) -> Result<()> {
        Ok(())
    }

    fn write_vulnerability(&mut self, _record: &VulnerabilityRecord) -> Result<()> {
        Ok(())
    }

    fn write_stored_vulnerability(&mut self, _path: &[VulnerabilityRecord]) -> Result<()> {
        Ok(())
    }
}

/// One line of the structured log
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StructuredEntry<'a> {
    ScanStart {
        timestamp: String,
        target: &'a str,
    },
    ScanEnd {
        timestamp: String,
        elapsed_ms: u64,
    },
    Vulnerability {
        timestamp: String,
        id: String,
        #[serde(flatten)]
        record: &'a VulnerabilityRecord,
    },
    StoredVulnerability {
        timestamp: String,
        id: String,
        path: Vec<StoredStep<'a>>,
    },
}

#[derive(Debug, Serialize)]
struct StoredStep<'a> {
    id: String,
    #[serde(flatten)]
    record: &'a VulnerabilityRecord,
}

/// Writes one JSON object per event to a `.jsonl` file
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entry(&self, entry: &StructuredEntry<'_>) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        append_to_file(&self.path, line.as_bytes())
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl StructuredSink for JsonLinesSink {
    fn write_start(&mut self, target: &str) -> Result<()> {
        self.write_entry(&StructuredEntry::ScanStart {
            timestamp: now(),
            target,
        })
    }

    fn write_end(&mut self, elapsed: Duration) -> Result<()> {
        self.write_entry(&StructuredEntry::ScanEnd {
            timestamp: now(),
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    fn write_vulnerability(&mut self, record: &VulnerabilityRecord) -> Result<()> {
        self.write_entry(&StructuredEntry::Vulnerability {
            timestamp: now(),
            id: record.generate_id(),
            record,
        })
    }

    fn write_stored_vulnerability(&mut self, path: &[VulnerabilityRecord]) -> Result<()> {
        let steps: Vec<StoredStep<'_>> = path
            .iter()
            .map(|record| StoredStep {
                id: record.generate_id(),
                record,
            })
            .collect();

        self.write_entry(&StructuredEntry::StoredVulnerability {
            timestamp: now(),
            id: path_id(path),
            path: steps,
        })
    }
}
