use crate::output::{ExecutionSummary, OutputBuilder, Section, Verbosity};

/// Renders the result and nothing else: the first line of the last Reference's content,
/// or one error line.
#[derive(Debug, Default)]
pub struct QuietOutputBuilder {
    line: Option<String>,
}

impl QuietOutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputBuilder for QuietOutputBuilder {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Quiet
    }

    fn add_progress(&mut self, _message: &str) {}

    fn add_section(&mut self, _section: Section) {}

    fn add_summary(&mut self, summary: ExecutionSummary) {
        self.line = match &summary.failure {
            Some(failure) => Some(format!("error: {}", failure.message)),
            None => summary
                .result()
                .map(|r| r.content().lines().next().unwrap_or_default().to_string()),
        };
    }

    fn build(self: Box<Self>) -> String {
        self.line.unwrap_or_default()
    }
}
