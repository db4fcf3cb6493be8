//! Plain-text diff report for terminal output.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::diff::{ItemDiff, SnapshotDiff};
use chrono::{DateTime, SecondsFormat, Utc};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Unified diff reporter.
///
/// Prints a header naming the tag and phases, one unified diff per changed
/// item and a summary footer. Unchanged items only appear in the footer.
pub struct TextReporter {
    /// Use colored output
    colored: bool,
}

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn phase_line(&self, label: &str, phase: &str, captured_at: Option<DateTime<Utc>>) -> String {
        let mut line = format!("{}  {phase}", self.color(label, "cyan"));
        if let Some(at) = captured_at {
            line.push_str(&self.color(
                &format!("  (captured {})", at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                "dim",
            ));
        }
        line
    }

    fn push_item(&self, lines: &mut Vec<String>, item: &ItemDiff) {
        let title = format!(
            "== {} ({}, +{} -{})",
            item.name, item.change, item.lines_added, item.lines_removed
        );
        lines.push(self.color(&title, "bold"));
        if let Some((old, new)) = item.status_transition() {
            lines.push(format!(
                "{} {old} -> {new}",
                self.color("status:", "yellow")
            ));
        }
        if item.unified.is_empty() {
            lines.push(self.color("(content differs in non-text bytes)", "dim"));
            return;
        }
        for line in item.unified.lines() {
            lines.push(self.color_diff_line(line));
        }
    }

    fn color_diff_line(&self, line: &str) -> String {
        let color = if line.starts_with("+++") || line.starts_with("---") {
            "bold"
        } else if line.starts_with('+') {
            "green"
        } else if line.starts_with('-') {
            "red"
        } else if line.starts_with("@@") {
            "cyan"
        } else if line.starts_with('\\') {
            "dim"
        } else {
            return line.to_string();
        };
        self.color(line, color)
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn generate_diff_report(&self, result: &SnapshotDiff) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color(&format!("Snapshot diff: {}", result.tag), "bold"));
        lines.push(self.phase_line("Old:", &result.old_phase, result.old_captured_at));
        lines.push(self.phase_line("New:", &result.new_phase, result.new_captured_at));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if result.has_changes() {
            for item in result.changed_items() {
                self.push_item(&mut lines, item);
                lines.push(String::new());
            }
        } else {
            lines.push(self.color("No differences", "dim"));
            lines.push(String::new());
        }

        let summary = &result.summary;
        lines.push(format!(
            "{} {} modified, {} added, {} removed, {} unchanged",
            self.color("Summary:", "bold"),
            self.color(&summary.modified.to_string(), "yellow"),
            self.color(&summary.added.to_string(), "green"),
            self.color(&summary.removed.to_string(), "red"),
            summary.unchanged,
        ));

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}
