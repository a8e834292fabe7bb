use tracing::debug;

use crate::error::Result;
use crate::report::record::{
    AnalysisEvent, Finding, ScanEnd, ScanStart, StoredVulnerabilityPath, VulnerabilityRecord,
};
use crate::report::render::ReportRenderer;
use crate::report::sink::ReportSink;
use crate::report::structured::StructuredSink;
use crate::resolver::FunctionResolver;

/// Drives one report from scan start to scan end.
///
/// Every finding gets one `|> N` ... `<|` entry. The entry is rendered in
/// full and handed to the text sink in a single append, then the event is
/// forwarded to the structured sink. Sink errors propagate unchanged.
///
/// Methods take `&mut self`; a session shared between threads needs an
/// external lock around each call.
pub struct ReportSession<T: ReportSink, S: StructuredSink> {
    resolver: Box<dyn FunctionResolver>,
    text: T,
    structured: S,
    next_report: u64,
}

impl<T: ReportSink, S: StructuredSink> ReportSession<T, S> {
    pub fn new(resolver: Box<dyn FunctionResolver>, text: T, structured: S) -> Self {
        Self {
            resolver,
            text,
            structured,
            next_report: 1,
        }
    }

    /// Number the next vulnerability entry will carry
    pub fn next_report_number(&self) -> u64 {
        self.next_report
    }

    pub fn into_parts(self) -> (T, S) {
        (self.text, self.structured)
    }

    fn renderer(&self) -> ReportRenderer<'_> {
        ReportRenderer::new(self.resolver.as_ref())
    }

    pub fn on_scan_start(&mut self, event: &ScanStart) -> Result<()> {
        let block = self.renderer().render_scan_start(event);
        self.text.append(&block)?;
        self.structured.write_start(&event.target)
    }

    pub fn on_scan_end(&mut self, event: &ScanEnd) -> Result<()> {
        let block = self.renderer().render_scan_end(event);
        self.text.append(&block)?;
        self.structured.write_end(event.elapsed)
    }

    pub fn on_vulnerability(&mut self, record: &VulnerabilityRecord) -> Result<()> {
        let body = self.renderer().render_vulnerability(record);
        self.append_entry(&body)?;
        self.structured.write_vulnerability(record)
    }

    pub fn on_stored_vulnerability_path(&mut self, path: &StoredVulnerabilityPath) -> Result<()> {
        let body = self.renderer().render_stored_path(path);
        self.append_entry(&body)?;
        self.structured.write_stored_vulnerability(&path.records)
    }

    pub fn on_finding(&mut self, finding: &Finding) -> Result<()> {
        match finding {
            Finding::Single(record) => self.on_vulnerability(record),
            Finding::StoredPath(path) => self.on_stored_vulnerability_path(path),
        }
    }

    pub fn handle(&mut self, event: &AnalysisEvent) -> Result<()> {
        match event {
            AnalysisEvent::ScanStart(start) => self.on_scan_start(start),
            AnalysisEvent::ScanEnd(end) => self.on_scan_end(end),
            AnalysisEvent::Vulnerability(record) => self.on_vulnerability(record),
            AnalysisEvent::StoredVulnerability(path) => self.on_stored_vulnerability_path(path),
        }
    }

    fn append_entry(&mut self, body: &str) -> Result<()> {
        let number = self.next_report;
        self.next_report += 1;
        debug!("Writing report entry {}", number);

        let entry = format!("|> {}\n{}\n<|\n", number, body);
        self.text.append(&entry)
    }
}
