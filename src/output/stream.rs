//! Unbuffered rendering: everything is written as it happens and `build` returns nothing.

use crate::output::{ExecutionSummary, OutputBuilder, Section, Verbosity};
use std::io::Write;
use tracing::debug;

pub struct StreamOutputBuilder {
    sink: Box<dyn Write + Send>,
}

impl StreamOutputBuilder {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    fn emit(&mut self, text: &str) {
        let written = writeln!(self.sink, "{}", text).and_then(|_| self.sink.flush());
        if let Err(e) = written {
            debug!("Stream output write failed: {}", e);
        }
    }
}

impl OutputBuilder for StreamOutputBuilder {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Stream
    }

    fn add_progress(&mut self, message: &str) {
        self.emit(&format!("» {}", message));
    }

    fn add_section(&mut self, section: Section) {
        self.emit(&format!("── {} ──\n{}", section.title, section.body));
    }

    /// Sections already carried the results; only what was never emitted is written here.
    fn add_summary(&mut self, summary: ExecutionSummary) {
        for warning in &summary.warnings {
            self.emit(&format!("warning: {}", warning));
        }
        if let Some(location) = &summary.output_location {
            self.emit(&format!("Output: {}", location.display()));
        }
        if let Some(failure) = &summary.failure {
            self.emit(&format!(
                "error: {} failed ({}): {}",
                summary.command, failure.category, failure.message
            ));
        }
    }

    fn build(self: Box<Self>) -> String {
        String::new()
    }
}
