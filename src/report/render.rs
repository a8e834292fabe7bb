use std::time::Duration;

use tracing::debug;

use crate::report::record::{
    CallFrame, ScanEnd, ScanStart, StoredVulnerabilityPath, VulnerabilityRecord,
};
use crate::resolver::FunctionResolver;

pub const BANNER: [&str; 4] = [
    "              -----------------------------              ",
    "=============              Eir              =============",
    "============= Vulnerability Scanning Report =============",
    "              -----------------------------              ",
];

pub const SEPARATOR: &str = "---------------------------------------------------------";

const STACK_ARROW: &str = " → ";
const TAINT_INCLUDE_ARROW: &str = "->";

/// Turns report events into text fragments.
///
/// Rendering does no I/O. The only collaborator is the function resolver,
/// queried for the top frame of each call stack.
pub struct ReportRenderer<'a> {
    resolver: &'a dyn FunctionResolver,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(resolver: &'a dyn FunctionResolver) -> Self {
        Self { resolver }
    }

    pub fn render_scan_start(&self, event: &ScanStart) -> String {
        let mut out = String::new();
        for line in BANNER {
            push_line(&mut out, line);
        }
        push_line(&mut out, &format!("Target                  : {}", event.target));
        push_line(
            &mut out,
            &format!(
                "Scanning all subroutines: {}",
                if event.scan_all_subroutines { "Yes" } else { "No" }
            ),
        );
        push_line(&mut out, SEPARATOR);
        out
    }

    pub fn render_scan_end(&self, event: &ScanEnd) -> String {
        let mut out = String::new();
        push_line(&mut out, SEPARATOR);
        push_line(&mut out, &format!("Time spent: {}", format_elapsed(event.elapsed)));
        push_line(&mut out, SEPARATOR);
        out
    }

    /// Body of a single vulnerability entry, without the `|>`/`<|` framing.
    ///
    /// The call stack line is not newline-terminated; the resolution block
    /// follows it directly.
    pub fn render_vulnerability(&self, record: &VulnerabilityRecord) -> String {
        let mut out = String::new();
        push_line(&mut out, &format!("Message: {}", record.message));
        push_line(
            &mut out,
            &format!("Include stack:{}", record.include_stack.join(STACK_ARROW)),
        );
        out.push_str(&format!("Call stack: {}", join_frames(&record.call_stack)));
        out.push_str(&self.render_resolution(record));
        out
    }

    /// Body of a stored taint path: every step rendered back to back.
    pub fn render_stored_path(&self, path: &StoredVulnerabilityPath) -> String {
        let mut out = String::new();
        for record in &path.records {
            push_line(&mut out, ">> Taint Path: ");
            push_line(&mut out, &record.message);
            push_line(&mut out, &record.include_stack.join(TAINT_INCLUDE_ARROW));
            push_line(&mut out, &format!("Callstack: {}", join_frames(&record.call_stack)));
            out.push_str(&self.render_resolution(record));
        }
        out
    }

    /// Function and file block for the top frame, or nothing when it cannot
    /// be resolved.
    pub fn render_resolution(&self, record: &VulnerabilityRecord) -> String {
        let Some(top) = record.top_frame() else {
            return String::new();
        };

        let candidates = self.resolver.lookup(&top.name);
        match candidates.as_slice() {
            [] => {
                debug!("No definition found for '{}'", top.name);
                String::new()
            }
            [only] => match only.file.as_deref().filter(|f| !f.trim().is_empty()) {
                Some(file) => format!("Function/method: {}\nIn file: {}", only.name, file),
                None => format!("Function/method: {}", only.name),
            },
            [first, ..] => {
                debug!(
                    "Ambiguous definition for '{}': {} candidates",
                    top.name,
                    candidates.len()
                );
                let files: Vec<&str> = candidates
                    .iter()
                    .map(|c| c.file.as_deref().unwrap_or(""))
                    .collect();
                format!(
                    "Function/method: {}\nFile candidates: \n{}",
                    first.name,
                    files.join("\n")
                )
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn join_frames(frames: &[CallFrame]) -> String {
    frames
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(STACK_ARROW)
}

/// Format a duration as `[d.]hh:mm:ss[.fffffff]`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    // 100ns ticks
    let ticks = elapsed.subsec_nanos() / 100;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}
