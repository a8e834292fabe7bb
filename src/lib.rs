//! Report writer for the Eir PHP vulnerability scanner.
//!
//! The analysis engine emits scan lifecycle events and findings; a
//! [`ReportSession`] turns them into an append-only text report and mirrors
//! them to a [`StructuredSink`].

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod resolver;

pub use error::{ReportError, Result};
pub use report::record::{
    AnalysisEvent, CallFrame, Finding, FunctionCandidate, ScanEnd, ScanStart,
    StoredVulnerabilityPath, VulnerabilityRecord,
};
pub use report::render::ReportRenderer;
pub use report::session::ReportSession;
pub use report::sink::{BufferSink, FileSink, ReportSink};
pub use report::structured::{JsonLinesSink, NullStructuredSink, StructuredSink};
pub use resolver::{FunctionCatalog, FunctionResolver, NoopResolver};
