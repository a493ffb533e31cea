//! Adapter for the bundled dependency extractor (NeoDepends).

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use super::outcome::{FailureCause, StageFailure, StageOutcome};
use super::request::Language;
use crate::context::ServiceContext;
use crate::ports::clock::elapsed;
use crate::ports::{joined_arg, ProcessSpec};

/// Runs the extractor as a child process: one invocation, one outcome.
pub struct ExtractorAdapter<'a> {
    ctx: &'a ServiceContext,
    program: PathBuf,
}

impl<'a> ExtractorAdapter<'a> {
    /// Creates an adapter for the extractor executable at `program`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, program: impl Into<PathBuf>) -> Self {
        Self { ctx, program: program.into() }
    }

    /// The fixed-shape invocation. The detailed (`-D`) flag is always on.
    #[must_use]
    pub fn command(
        &self,
        source_directory: &Path,
        database: &Path,
        language: Language,
    ) -> ProcessSpec {
        ProcessSpec {
            program: self.program.clone(),
            args: vec![
                joined_arg("--input=", source_directory),
                joined_arg("--output=", database),
                joined_arg("-l", language.as_str()),
                "-D".into(),
            ],
        }
    }

    /// Marks the extractor executable, runs it, and classifies the exit.
    ///
    /// Standard error is forwarded uninterpreted on failure.
    #[must_use]
    pub fn run(
        &self,
        source_directory: &Path,
        database: &Path,
        language: Language,
    ) -> StageOutcome {
        if let Err(e) = self.ctx.fs.set_executable(&self.program) {
            warn!(program = %self.program.display(), error = %e, "extractor is not runnable");
            return StageOutcome::Failure(StageFailure {
                cause: FailureCause::Error(e.to_string()),
                diagnostic: String::new(),
                duration: Duration::ZERO,
            });
        }

        let spec = self.command(source_directory, database, language);
        let start = self.ctx.clock.now();
        let result = self.ctx.process.run(&spec);
        let duration = elapsed(start, self.ctx.clock.now());
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(output) if output.success() => {
                info!(duration_ms, database = %database.display(), "extraction finished");
                StageOutcome::Success(duration)
            }
            Ok(output) => {
                warn!(duration_ms, exit_code = output.exit_code, "extraction failed");
                StageOutcome::Failure(StageFailure {
                    cause: FailureCause::ExitCode(output.exit_code),
                    diagnostic: output.stderr,
                    duration,
                })
            }
            Err(e) => {
                warn!(duration_ms, error = %e, "extractor could not be run");
                StageOutcome::Failure(StageFailure {
                    cause: FailureCause::Error(e.to_string()),
                    diagnostic: String::new(),
                    duration,
                })
            }
        }
    }
}
