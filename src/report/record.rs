use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Emitted once when the analysis engine starts a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStart {
    /// File or directory under analysis
    pub target: String,

    /// Whether every subroutine is scanned, not only reachable ones
    #[serde(default)]
    pub scan_all_subroutines: bool,
}

/// Emitted once when the analysis engine finishes a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEnd {
    /// Wall-clock time of the run
    #[serde(rename = "elapsed_ms", with = "duration_ms")]
    pub elapsed: Duration,
}

/// One frame of a call stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFrame {
    /// Function or method name as written in the analysed source
    pub name: String,
}

impl CallFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single vulnerability reported by the analysis engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    /// Human-readable description
    pub message: String,

    /// File inclusion chain, root first
    #[serde(default)]
    pub include_stack: Vec<String>,

    /// Active calls, innermost first. The first element is the top frame.
    #[serde(default)]
    pub call_stack: Vec<CallFrame>,
}

impl VulnerabilityRecord {
    /// The most recently entered call, if any
    pub fn top_frame(&self) -> Option<&CallFrame> {
        self.call_stack.first()
    }

    /// Generate a deterministic ID from the message and both stacks
    pub fn generate_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.message.as_bytes());
        for include in &self.include_stack {
            hasher.update(b"\0");
            hasher.update(include.as_bytes());
        }
        for frame in &self.call_stack {
            hasher.update(b"\x01");
            hasher.update(frame.name.as_bytes());
        }
        short_id(hasher)
    }
}

/// Deterministic ID for a whole taint path, derived from its steps' IDs
pub fn path_id(records: &[VulnerabilityRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"path");
    for record in records {
        hasher.update(record.generate_id().as_bytes());
    }
    short_id(hasher)
}

fn short_id(hasher: Sha256) -> String {
    let result = hasher.finalize();
    let hex = format!("{:x}", result);
    format!("EIR-{}", &hex[..8])
}

/// A multi-step taint propagation trace, one record per step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredVulnerabilityPath {
    pub records: Vec<VulnerabilityRecord>,
}

impl From<Vec<VulnerabilityRecord>> for StoredVulnerabilityPath {
    fn from(records: Vec<VulnerabilityRecord>) -> Self {
        Self { records }
    }
}

/// A finding handed to the report session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Single(VulnerabilityRecord),
    StoredPath(StoredVulnerabilityPath),
}

/// Everything the analysis engine can emit, in the shape of the replay stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalysisEvent {
    ScanStart(ScanStart),
    ScanEnd(ScanEnd),
    Vulnerability(VulnerabilityRecord),
    StoredVulnerability(StoredVulnerabilityPath),
}

/// A possible definition for a function or method name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCandidate {
    pub name: String,

    /// Source file of the definition, when known
    #[serde(default)]
    pub file: Option<String>,
}

impl FunctionCandidate {
    pub fn new(name: impl Into<String>, file: Option<&str>) -> Self {
        Self {
            name: name.into(),
            file: file.map(str::to_string),
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
