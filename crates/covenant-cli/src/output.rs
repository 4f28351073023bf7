//! Output formatting for the CLI.

use colored::*;
use covenant_domain::RunSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Render the run summary as a table.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Candidates found", &summary.candidates.to_string()]);
        builder.push_record(["Already ingested (skipped)", &summary.skipped.to_string()]);
        builder.push_record(["Attempted", &summary.attempted.to_string()]);
        builder.push_record(["Succeeded", &summary.succeeded.to_string()]);
        builder.push_record(["Failed", &summary.failed.to_string()]);
        builder.push_record([
            "Success rate",
            &format!("{:.1}%", summary.success_rate() * 100.0),
        ]);
        builder.push_record(["Elapsed", &format!("{:.2}s", summary.elapsed.as_secs_f64())]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary() -> RunSummary {
        RunSummary {
            candidates: 3,
            skipped: 1,
            attempted: 2,
            succeeded: 2,
            failed: 0,
            elapsed: Duration::from_secs(4),
        }
    }

    #[test]
    fn test_summary_table_carries_counts() {
        let formatter = Formatter::new(false);
        let output = formatter.format_summary(&summary());

        assert!(output.contains("Candidates found"));
        assert!(output.contains("Succeeded"));
        assert!(output.contains("100.0%"));
        assert!(output.contains("4.00s"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
        assert_eq!(formatter.error("broken"), "✗ broken");
    }
}
