//! Stage outcomes and the assembled result of a run.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The two external stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Dependency extraction (NeoDepends).
    Extraction,
    /// File clustering (Deicide).
    Clustering,
}

impl Stage {
    /// Display name of the external tool behind the stage.
    #[must_use]
    pub fn tool(self) -> &'static str {
        match self {
            Self::Extraction => "NeoDepends",
            Self::Clustering => "Deicide",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction => f.write_str("extraction"),
            Self::Clustering => f.write_str("clustering"),
        }
    }
}

/// Why a stage failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The tool ran and reported a non-zero status.
    ExitCode(i32),
    /// The tool could not be run, or failed outside its exit convention.
    Error(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitCode(code) => write!(f, "exit code {code}"),
            Self::Error(message) => f.write_str(message),
        }
    }
}

/// A failed stage, with the tool's diagnostic text forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Exit code or error.
    pub cause: FailureCause,
    /// Captured standard error of the tool.
    pub diagnostic: String,
    /// Wall-clock time until the tool finished.
    pub duration: Duration,
}

/// What a stage adapter hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage finished cleanly after this long.
    Success(Duration),
    /// The stage failed.
    Failure(StageFailure),
}

impl StageOutcome {
    /// Wall-clock duration of the stage, successful or not.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self {
            Self::Success(duration) => *duration,
            Self::Failure(failure) => failure.duration,
        }
    }

    /// Returns `true` for [`StageOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A stage outcome tagged with its stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Which stage ran.
    pub stage: Stage,
    /// How it went.
    pub outcome: StageOutcome,
}

/// Non-fatal problem while listing the produced files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingWarning {
    /// Directory that could not be listed.
    pub path: PathBuf,
    /// Underlying error text.
    pub message: String,
}

impl fmt::Display for ReportingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not list {}: {}", self.path.display(), self.message)
    }
}

/// Everything a successful run reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// Outcomes in execution order (always extraction, then clustering).
    pub stage_outcomes: Vec<StageReport>,
    /// Entries of the output directory, sorted by name.
    pub produced_files: Vec<PathBuf>,
    /// Wall-clock time for the whole run.
    pub total_duration: Duration,
    /// Set when the output listing failed.
    pub warning: Option<ReportingWarning>,
}
