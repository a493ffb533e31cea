//! Fatal pipeline errors and the failed-run report.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::outcome::{Stage, StageFailure, StageReport};
use super::runner::PipelineState;
use crate::ports::PortError;

/// Fatal pipeline errors. Each one stops the run where it happens.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source tree is missing or the output directory cannot be prepared.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// Path the operation was attempted on.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: PortError,
    },

    /// The extractor did not exit cleanly; clustering was skipped.
    #[error("NeoDepends failed ({})", .0.cause)]
    Extraction(StageFailure),

    /// The clustering engine signalled an error.
    #[error("Deicide failed ({})", .0.cause)]
    Clustering(StageFailure),
}

impl PipelineError {
    /// The stage that failed, if the error came from one.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Extraction(_) => Some(Stage::Extraction),
            Self::Clustering(_) => Some(Stage::Clustering),
            Self::Filesystem { .. } => None,
        }
    }

    /// The failing tool's captured diagnostic text, if a stage failed.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Extraction(failure) | Self::Clustering(failure) => {
                Some(failure.diagnostic.as_str())
            }
            Self::Filesystem { .. } => None,
        }
    }
}

/// A run that ended in [`PipelineState::Failed`].
#[derive(Error, Debug)]
#[error("{error}")]
pub struct PipelineFailure {
    /// The error that stopped the run.
    #[source]
    pub error: PipelineError,
    /// State the pipeline was in when it failed.
    pub failed_in: PipelineState,
    /// Outcomes of the stages that ran, the failing one last.
    pub stage_outcomes: Vec<StageReport>,
    /// Wall-clock time from start to the failure.
    pub elapsed: Duration,
}
