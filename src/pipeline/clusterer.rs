//! Adapter for the Deicide clustering engine.

use std::ffi::OsString;
use std::path::Path;

use tracing::{info, warn};

use super::outcome::{FailureCause, StageFailure, StageOutcome};
use crate::context::ServiceContext;
use crate::ports::clock::elapsed;
use crate::ports::ClusterExit;

/// Flag asking the engine for a DV8-compatible report.
pub const COMPATIBILITY_FLAG: &str = "--dv8-result";

/// Translates a run's fields into engine arguments and classifies the result.
pub struct ClustererAdapter<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ClustererAdapter<'a> {
    /// Creates an adapter calling `ctx.clusterer`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Engine arguments; the compatibility flag is appended only when requested.
    #[must_use]
    pub fn arguments(
        database: &Path,
        report: &Path,
        target_file: &Path,
        compatibility_mode: bool,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--input".into(),
            database.into(),
            "--output".into(),
            report.into(),
            "--filename".into(),
            target_file.into(),
        ];
        if compatibility_mode {
            args.push(COMPATIBILITY_FLAG.into());
        }
        args
    }

    /// Runs the engine once. A normal return or a zero exit code is success.
    #[must_use]
    pub fn run(
        &self,
        database: &Path,
        report: &Path,
        target_file: &Path,
        compatibility_mode: bool,
    ) -> StageOutcome {
        let args = Self::arguments(database, report, target_file, compatibility_mode);
        let start = self.ctx.clock.now();
        let result = self.ctx.clusterer.cluster(&args);
        let duration = elapsed(start, self.ctx.clock.now());
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(output) if output.exit.is_success() => {
                info!(
                    duration_ms,
                    exit = ?output.exit,
                    report = %report.display(),
                    "clustering finished"
                );
                StageOutcome::Success(duration)
            }
            Ok(output) => {
                warn!(duration_ms, exit = ?output.exit, "clustering failed");
                let code = match output.exit {
                    ClusterExit::Exited(code) => code,
                    ClusterExit::Returned => 0,
                };
                StageOutcome::Failure(StageFailure {
                    cause: FailureCause::ExitCode(code),
                    diagnostic: output.stderr,
                    duration,
                })
            }
            Err(e) => {
                warn!(duration_ms, error = %e, "clustering engine raised an error");
                let message = e.to_string();
                StageOutcome::Failure(StageFailure {
                    cause: FailureCause::Error(message.clone()),
                    diagnostic: message,
                    duration,
                })
            }
        }
    }
}
