use std::path::Path;

use owo_colors::OwoColorize;

use crate::engine::ReplaySummary;

/// Print a replay summary to the terminal with colors
pub fn render(summary: &ReplaySummary, report_path: &Path) {
    println!();
    println!(
        "{}  Eir v{} — Replayed {} events in {:.2}s",
        "📝".bold(),
        env!("CARGO_PKG_VERSION"),
        summary.events,
        summary.duration_ms as f64 / 1000.0
    );
    println!();

    if summary.findings() == 0 {
        println!("  {}  No vulnerabilities reported", "✅".bold());
    } else {
        let mut parts = Vec::new();
        if summary.vulnerabilities > 0 {
            parts.push(
                format!("{} vulnerabilities", summary.vulnerabilities)
                    .red()
                    .bold()
                    .to_string(),
            );
        }
        if summary.taint_paths > 0 {
            parts.push(
                format!("{} taint paths", summary.taint_paths)
                    .yellow()
                    .bold()
                    .to_string(),
            );
        }
        println!(
            "  Reported {} findings: {}",
            summary.findings().to_string().bold(),
            parts.join(", ")
        );
    }

    println!(
        "  {} {}",
        "⮕".green(),
        report_path.display().to_string().dimmed()
    );
    println!("{}", "━".repeat(60));
    println!();
}
