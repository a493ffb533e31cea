//! Two-stage analysis pipeline: dependency extraction, then clustering.
//!
//! The [`Pipeline`] owns the run; the stage adapters and the artifact store
//! only see the slice of the [`PipelineRequest`] they need.

pub mod artifacts;
pub mod clusterer;
pub mod error;
pub mod extractor;
pub mod outcome;
pub mod progress;
pub mod request;
pub mod runner;

pub use artifacts::{ArtifactPaths, ArtifactStore, Enumeration};
pub use clusterer::ClustererAdapter;
pub use error::{PipelineError, PipelineFailure};
pub use extractor::ExtractorAdapter;
pub use outcome::{
    FailureCause, PipelineResult, ReportingWarning, Stage, StageFailure, StageOutcome,
    StageReport,
};
pub use progress::{ConsoleProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use request::{Language, PipelineRequest};
pub use runner::{Pipeline, PipelineState};
