//! Full rendering: progress trail, every section, and a reference table with metadata.

use crate::output::{ExecutionSummary, OutputBuilder, OutputOptions, Section, Verbosity};
use comfy_table::Table;
use owo_colors::OwoColorize;

pub struct VerboseOutputBuilder {
    options: OutputOptions,
    progress: Vec<String>,
    sections: Vec<Section>,
    summary: Option<ExecutionSummary>,
}

impl VerboseOutputBuilder {
    pub fn new(options: OutputOptions) -> Self {
        Self {
            options,
            progress: Vec::new(),
            sections: Vec::new(),
            summary: None,
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.options.color {
            text.bold().underline().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputBuilder for VerboseOutputBuilder {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Verbose
    }

    fn add_progress(&mut self, message: &str) {
        self.progress.push(message.to_string());
    }

    fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    fn add_summary(&mut self, summary: ExecutionSummary) {
        self.summary = Some(summary);
    }

    fn build(self: Box<Self>) -> String {
        let mut out = Vec::new();

        for message in &self.progress {
            out.push(format!("» {}", message));
        }

        for section in &self.sections {
            out.push(String::new());
            out.push(self.heading(&format!("── {} ──", section.title)));
            out.push(section.body.clone());
        }

        if let Some(summary) = &self.summary {
            out.push(String::new());
            out.push(self.heading("Summary"));
            out.push(format!("  Command:  {}", summary.command));
            out.push(format!("  Duration: {}ms", summary.duration_ms));
            if let Some(location) = &summary.output_location {
                out.push(format!("  Output:   {}", location.display()));
            }
            if let Some(failure) = &summary.failure {
                out.push(format!("  Status:   failed ({})", failure.category));
                out.push(format!("  Error:    {}", failure.message));
                out.push(format!("  Exit:     {}", failure.exit_code));
            } else {
                out.push("  Status:   ok".to_string());
            }

            if !summary.references.is_empty() {
                out.push(reference_table(summary).to_string());
            }

            if !summary.warnings.is_empty() {
                out.push(format!("Warnings ({}):", summary.warnings.len()));
                for warning in &summary.warnings {
                    out.push(format!("  - {}", warning));
                }
            }
        }
        out.join("\n")
    }
}

fn reference_table(summary: &ExecutionSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Id", "Token", "File", "Timestamp", "Decorators"]);
    for reference in &summary.references {
        let decorators: Vec<String> = reference
            .metadata()
            .iter()
            .map(|record| match &record.detail {
                Some(detail) => format!("{}({})", record.decorator, detail),
                None => record.decorator.clone(),
            })
            .collect();
        table.add_row(vec![
            reference.id().to_string(),
            reference.token().unwrap_or("-").to_string(),
            reference.file_name().unwrap_or("-").to_string(),
            reference.timestamp().to_rfc3339(),
            if decorators.is_empty() {
                "-".to_string()
            } else {
                decorators.join(" → ")
            },
        ]);
    }
    table
}
