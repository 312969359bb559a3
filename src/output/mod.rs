//! Output builders
//!
//! Every command invocation is wrapped by exactly one [`OutputBuilder`], chosen from the
//! resolved [`Verbosity`]. Callers always make the same calls (`add_progress`,
//! `add_section`, one `add_summary`, then `build`); the builder alone decides what becomes
//! visible.

pub mod quiet;
pub mod stream;
pub mod summary;
pub mod verbose;

pub use quiet::QuietOutputBuilder;
pub use stream::StreamOutputBuilder;
pub use summary::SummaryOutputBuilder;
pub use verbose::VerboseOutputBuilder;

use crate::error::ApiError;
use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Summary,
    Verbose,
    Stream,
}

impl Verbosity {
    pub const ALL: [Verbosity; 4] = [
        Verbosity::Quiet,
        Verbosity::Summary,
        Verbosity::Verbose,
        Verbosity::Stream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Summary => "summary",
            Verbosity::Verbose => "verbose",
            Verbosity::Stream => "stream",
        }
    }

    /// Pick the level for one invocation: explicit flag, then the command's declared
    /// default, then the configured default, then summary.
    pub fn resolve(
        flag: Option<Verbosity>,
        command_default: Option<Verbosity>,
        configured: Option<Verbosity>,
    ) -> Verbosity {
        flag.or(command_default).or(configured).unwrap_or_default()
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "summary" => Ok(Verbosity::Summary),
            "verbose" => Ok(Verbosity::Verbose),
            "stream" => Ok(Verbosity::Stream),
            other => Err(format!(
                "Unknown verbosity '{}' (expected quiet, summary, verbose or stream)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// ANSI colors in rendered text
    pub color: bool,
}

/// A titled block of detail, typically one stored Reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn for_reference(reference: &Reference) -> Self {
        let title = match reference.token() {
            Some(token) => format!("{} ({})", token, reference.id()),
            None => reference.id().to_string(),
        };
        Self::new(title, reference.content())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    pub category: String,
    pub message: String,
    pub exit_code: i32,
}

impl FailureSummary {
    pub fn from_error(error: &ApiError) -> Self {
        Self {
            category: error.category().to_string(),
            message: error.to_string(),
            exit_code: error.exit_code(),
        }
    }
}

/// Everything known about one finished invocation.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    pub command: String,
    pub references: Vec<Reference>,
    pub output_location: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub duration_ms: u128,
    pub failure: Option<FailureSummary>,
}

impl ExecutionSummary {
    /// The Reference a one-line rendering should show: the last one stored.
    pub fn result(&self) -> Option<&Reference> {
        self.references.last()
    }
}

pub trait OutputBuilder: Send {
    fn verbosity(&self) -> Verbosity;

    fn add_progress(&mut self, message: &str);

    fn add_section(&mut self, section: Section);

    /// Called once by the executor after the command finishes.
    fn add_summary(&mut self, summary: ExecutionSummary);

    /// Render the invocation. Consumes the builder.
    fn build(self: Box<Self>) -> String;
}

pub fn create_output_builder(verbosity: Verbosity, options: OutputOptions) -> Box<dyn OutputBuilder> {
    match verbosity {
        Verbosity::Quiet => Box::new(QuietOutputBuilder::new()),
        Verbosity::Summary => Box::new(SummaryOutputBuilder::new(options)),
        Verbosity::Verbose => Box::new(VerboseOutputBuilder::new(options)),
        Verbosity::Stream => Box::new(StreamOutputBuilder::new(Box::new(std::io::stdout()))),
    }
}

/// First line of `content`, shortened to `max` characters.
pub(crate) fn preview(content: &str, max: usize) -> String {
    let line = content.lines().next().unwrap_or("");
    let mut shortened: String = line.chars().take(max).collect();
    if line.chars().count() > max || content.lines().nth(1).is_some() {
        shortened.push('…');
    }
    shortened
}
