//! Default rendering: result, tokens, output location and any warnings.

use crate::output::{preview, ExecutionSummary, OutputBuilder, OutputOptions, Section, Verbosity};
use owo_colors::OwoColorize;

const PREVIEW_CHARS: usize = 60;

pub struct SummaryOutputBuilder {
    options: OutputOptions,
    summary: Option<ExecutionSummary>,
}

impl SummaryOutputBuilder {
    pub fn new(options: OutputOptions) -> Self {
        Self {
            options,
            summary: None,
        }
    }
}

impl OutputBuilder for SummaryOutputBuilder {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Summary
    }

    fn add_progress(&mut self, _message: &str) {}

    fn add_section(&mut self, _section: Section) {}

    fn add_summary(&mut self, summary: ExecutionSummary) {
        self.summary = Some(summary);
    }

    fn build(self: Box<Self>) -> String {
        match &self.summary {
            Some(summary) => render(summary, self.options.color),
            None => String::new(),
        }
    }
}

fn render(summary: &ExecutionSummary, color: bool) -> String {
    let mut lines = Vec::new();

    if let Some(failure) = &summary.failure {
        let head = format!("✗ {} failed ({})", summary.command, failure.category);
        lines.push(if color { head.red().bold().to_string() } else { head });
        lines.push(format!("  {}", failure.message));
        lines.push(format!("  exit code: {}", failure.exit_code));
    } else {
        let head = format!(
            "✓ {} stored {} reference(s) in {}ms",
            summary.command,
            summary.references.len(),
            summary.duration_ms
        );
        lines.push(if color { head.green().bold().to_string() } else { head });

        if let Some(result) = summary.result() {
            lines.push(format!("Result: {}", result.content()));
        }
        if summary.references.len() > 1 || summary.references.iter().any(|r| r.token().is_some()) {
            lines.push("References:".to_string());
            for reference in &summary.references {
                lines.push(format!(
                    "  {} = {}",
                    reference.label(),
                    preview(reference.content(), PREVIEW_CHARS)
                ));
            }
        }
    }

    if let Some(location) = &summary.output_location {
        lines.push(format!("Output: {}", location.display()));
    }

    if !summary.warnings.is_empty() {
        let head = format!("Warnings ({}):", summary.warnings.len());
        lines.push(if color { head.yellow().to_string() } else { head });
        for warning in &summary.warnings {
            lines.push(format!("  - {}", warning));
        }
    }
    lines.join("\n")
}
