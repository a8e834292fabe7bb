use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::report::record::AnalysisEvent;
use crate::report::session::ReportSession;
use crate::report::sink::{FileSink, ReportSink};
use crate::report::structured::{JsonLinesSink, NullStructuredSink, StructuredSink};
use crate::resolver::{FunctionCatalog, FunctionResolver, NoopResolver};

/// Where a replay reads from and writes to
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// JSON-lines event stream produced by the analysis engine
    pub events: PathBuf,
    /// Text report, appended to
    pub report: PathBuf,
    /// Optional structured JSON-lines output
    pub structured: Option<PathBuf>,
    /// Optional function catalog for top-frame resolution
    pub functions: Option<PathBuf>,
}

/// Counts gathered while replaying an event stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub vulnerabilities: usize,
    pub taint_paths: usize,
    pub scans_completed: usize,
    pub duration_ms: u64,
}

impl ReplaySummary {
    /// Entries written between `|>` and `<|` markers
    pub fn findings(&self) -> usize {
        self.vulnerabilities + self.taint_paths
    }
}

/// Replays a recorded analysis run into a text report and, optionally,
/// a structured log.
pub struct Replayer {
    options: ReplayOptions,
}

impl Replayer {
    pub fn new(options: ReplayOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<ReplaySummary> {
        let start = Instant::now();

        let resolver: Box<dyn FunctionResolver> = match &self.options.functions {
            Some(path) => Box::new(FunctionCatalog::load(path)?),
            None => {
                debug!("No function catalog, top frames will not be resolved");
                Box::new(NoopResolver)
            }
        };

        let structured: Box<dyn StructuredSink> = match &self.options.structured {
            Some(path) => {
                let sink = JsonLinesSink::new(path);
                info!("Structured output: {}", sink.path().display());
                Box::new(sink)
            }
            None => Box::new(NullStructuredSink),
        };

        info!("Replaying {}", self.options.events.display());
        let file = std::fs::File::open(&self.options.events)?;
        let mut session = ReportSession::new(
            resolver,
            FileSink::new(&self.options.report),
            structured,
        );

        let mut summary = replay(std::io::BufReader::new(file), &mut session)?;
        summary.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Wrote {} findings to {}",
            summary.findings(),
            self.options.report.display()
        );
        Ok(summary)
    }
}

/// Feed every event of a JSON-lines stream to `session`, in order.
///
/// Blank lines are skipped. A malformed line or a sink failure stops the
/// replay; events before it have already been written.
pub fn replay<R, T, S>(reader: R, session: &mut ReportSession<T, S>) -> Result<ReplaySummary>
where
    R: BufRead,
    T: ReportSink,
    S: StructuredSink,
{
    let mut summary = ReplaySummary::default();
    let mut started = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let event: AnalysisEvent = serde_json::from_str(&line).map_err(|source| {
            ReportError::Event {
                line: line_number,
                source,
            }
        })?;

        match &event {
            AnalysisEvent::ScanStart(start) => {
                if started {
                    warn!(
                        "Line {}: scan of {} started before the previous one ended",
                        line_number, start.target
                    );
                }
                started = true;
            }
            AnalysisEvent::ScanEnd(_) => {
                if !started {
                    warn!("Line {}: scan ended without a matching start", line_number);
                }
                started = false;
                summary.scans_completed += 1;
            }
            AnalysisEvent::Vulnerability(_) => summary.vulnerabilities += 1,
            AnalysisEvent::StoredVulnerability(_) => summary.taint_paths += 1,
        }

        session.handle(&event)?;
        summary.events += 1;
    }

    if started {
        warn!("Event stream ended before the scan finished");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sink::BufferSink;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const EVENTS: &str = r#"{"event":"scan_start","target":"/srv/wp","scan_all_subroutines":true}

{"event":"vulnerability","message":"XSS","include_stack":["index.php"],"call_stack":[{"name":"render"}]}
{"event":"stored_vulnerability","records":[{"message":"a","include_stack":[],"call_stack":[]},{"message":"b"}]}
{"event":"scan_end","elapsed_ms":1200}
"#;

    #[test]
    fn test_replay_counts_events() {
        let mut session = ReportSession::new(
            Box::new(NoopResolver),
            BufferSink::new(),
            NullStructuredSink,
        );
        let summary = replay(Cursor::new(EVENTS), &mut session).unwrap();

        assert_eq!(summary.events, 4);
        assert_eq!(summary.vulnerabilities, 1);
        assert_eq!(summary.taint_paths, 1);
        assert_eq!(summary.scans_completed, 1);
        assert_eq!(summary.findings(), 2);
        assert_eq!(session.next_report_number(), 3);
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let mut session = ReportSession::new(
            Box::new(NoopResolver),
            BufferSink::new(),
            NullStructuredSink,
        );
        let input = "{\"event\":\"scan_start\",\"target\":\"x\"}\n{\"event\":\"bogus\"}\n";
        let err = replay(Cursor::new(input), &mut session).unwrap_err();

        assert!(matches!(err, ReportError::Event { line: 2, .. }));
        let (text, _) = session.into_parts();
        assert!(text.as_str().contains("Target                  : x"));
    }

    #[test]
    fn test_replayer_writes_both_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let events = temp_dir.path().join("events.jsonl");
        let functions = temp_dir.path().join("functions.json");
        let report = temp_dir.path().join("scan-report.txt");
        let structured = temp_dir.path().join("scan-report.jsonl");
        fs::write(&events, EVENTS).unwrap();
        fs::write(&functions, r#"[{"name":"render","file":"views/render.php"}]"#).unwrap();

        let summary = Replayer::new(ReplayOptions {
            events,
            report: report.clone(),
            structured: Some(structured.clone()),
            functions: Some(functions),
        })
        .run()
        .unwrap();
        assert_eq!(summary.findings(), 2);

        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("Call stack: renderFunction/method: render\nIn file: views/render.php\n<|\n"));
        assert!(text.contains("|> 2\n>> Taint Path: \na\n\nCallstack: \n"));
        assert!(text.contains("Time spent: 00:00:01.2000000\n"));

        let structured = fs::read_to_string(&structured).unwrap();
        assert_eq!(structured.lines().count(), 4);
    }
}
