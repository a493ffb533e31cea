//! The pipeline orchestrator.
//!
//! ```text
//! Init -> Preparing -> ExtractingDeps -> Clustering -> Summarizing -> Done
//!           |               |                |
//!           +---------------+----------------+--> Failed
//! ```
//!
//! Clustering never starts unless extraction succeeded. Nothing is retried
//! or rolled back: artifacts written before a failure stay on disk.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use super::artifacts::{ArtifactPaths, ArtifactStore};
use super::clusterer::ClustererAdapter;
use super::error::{PipelineError, PipelineFailure};
use super::extractor::ExtractorAdapter;
use super::outcome::{PipelineResult, Stage, StageOutcome, StageReport};
use super::progress::{ProgressEvent, ProgressReporter};
use super::request::PipelineRequest;
use crate::context::ServiceContext;
use crate::ports::clock::elapsed;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Validating and resolving the request.
    Init,
    /// Clearing and recreating the output directory.
    Preparing,
    /// Running the extractor.
    ExtractingDeps,
    /// Running the clustering engine.
    Clustering,
    /// Listing the produced files.
    Summarizing,
    /// Finished successfully.
    Done,
    /// Stopped on a fatal error.
    Failed,
}

/// Sequences one run: prepare, extract, cluster, summarize.
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    extractor_program: PathBuf,
}

/// Mutable bookkeeping for a single run.
struct RunLog {
    state: PipelineState,
    stages: Vec<StageReport>,
    started: DateTime<Utc>,
}

impl RunLog {
    fn advance(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }

    fn fail(self, ctx: &ServiceContext, error: PipelineError) -> PipelineFailure {
        let elapsed = elapsed(self.started, ctx.clock.now());
        error!(state = ?self.state, error = %error, "pipeline failed");
        debug!(from = ?self.state, to = ?PipelineState::Failed, "pipeline transition");
        PipelineFailure { error, failed_in: self.state, stage_outcomes: self.stages, elapsed }
    }
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline running the extractor at `extractor_program`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, extractor_program: impl Into<PathBuf>) -> Self {
        Self { ctx, extractor_program: extractor_program.into() }
    }

    /// Runs both stages for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] when the source directory is missing, the
    /// output directory cannot be prepared, or either stage fails. The failure
    /// carries the outcomes so far and the time elapsed until it happened.
    pub fn run(
        &self,
        request: &PipelineRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineResult, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let _span = info_span!(
            "pipeline",
            %run_id,
            language = %request.language,
            target = %request.target_file.display(),
        )
        .entered();

        let mut log = RunLog {
            state: PipelineState::Init,
            stages: Vec::new(),
            started: self.ctx.clock.now(),
        };

        // Init: resolve and validate.
        let request = match request.resolved() {
            Ok(resolved) => resolved,
            Err(e) => {
                let error = PipelineError::Filesystem {
                    path: request.source_directory.clone(),
                    source: Box::new(e),
                };
                return Err(log.fail(self.ctx, error));
            }
        };
        if !self.ctx.fs.is_dir(&request.source_directory) {
            let error = PipelineError::Filesystem {
                path: request.source_directory.clone(),
                source: "source directory does not exist or is not a directory".into(),
            };
            return Err(log.fail(self.ctx, error));
        }
        let artifacts = ArtifactPaths::for_output_dir(&request.output_directory);
        info!(
            source = %request.source_directory.display(),
            output = %request.output_directory.display(),
            "starting analysis"
        );

        // Preparing: the destructive overwrite is announced before it happens.
        log.advance(PipelineState::Preparing);
        let store = ArtifactStore::new(self.ctx);
        if store.will_overwrite(&request.output_directory) {
            progress.report(ProgressEvent::Overwriting {
                output_directory: request.output_directory.clone(),
            });
        }
        if let Err(error) = store.prepare(&request.output_directory) {
            return Err(log.fail(self.ctx, error));
        }

        // ExtractingDeps
        log.advance(PipelineState::ExtractingDeps);
        {
            let _stage = info_span!("stage", stage = %Stage::Extraction).entered();
            progress.report(ProgressEvent::StageStarted { stage: Stage::Extraction });
            let outcome = ExtractorAdapter::new(self.ctx, &self.extractor_program).run(
                &request.source_directory,
                &artifacts.dependency_database,
                request.language,
            );
            log.stages.push(StageReport { stage: Stage::Extraction, outcome: outcome.clone() });
            match outcome {
                StageOutcome::Success(duration) => progress.report(ProgressEvent::StageFinished {
                    stage: Stage::Extraction,
                    duration,
                    artifact: artifacts.dependency_database.clone(),
                }),
                StageOutcome::Failure(failure) => {
                    return Err(log.fail(self.ctx, PipelineError::Extraction(failure)));
                }
            }
        }

        // Clustering: consumes exactly the database the extractor wrote.
        log.advance(PipelineState::Clustering);
        {
            let _stage = info_span!("stage", stage = %Stage::Clustering).entered();
            progress.report(ProgressEvent::StageStarted { stage: Stage::Clustering });
            let outcome = ClustererAdapter::new(self.ctx).run(
                &artifacts.dependency_database,
                &artifacts.clustering_report,
                &request.target_file,
                request.compatibility_mode,
            );
            log.stages.push(StageReport { stage: Stage::Clustering, outcome: outcome.clone() });
            match outcome {
                StageOutcome::Success(duration) => progress.report(ProgressEvent::StageFinished {
                    stage: Stage::Clustering,
                    duration,
                    artifact: artifacts.clustering_report.clone(),
                }),
                StageOutcome::Failure(failure) => {
                    return Err(log.fail(self.ctx, PipelineError::Clustering(failure)));
                }
            }
        }

        // Summarizing: best effort, cannot fail the run.
        log.advance(PipelineState::Summarizing);
        let listing = store.enumerate(&request.output_directory);
        let total_duration = elapsed(log.started, self.ctx.clock.now());
        progress.report(ProgressEvent::Summary {
            files: listing.files.clone(),
            warning: listing.warning.clone(),
            total: total_duration,
            output_directory: request.output_directory.clone(),
        });

        log.advance(PipelineState::Done);
        info!(
            total_ms = u64::try_from(total_duration.as_millis()).unwrap_or(u64::MAX),
            files = listing.files.len(),
            "analysis complete"
        );
        Ok(PipelineResult {
            stage_outcomes: log.stages,
            produced_files: listing.files,
            total_duration,
            warning: listing.warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::RunnerConfig;
    use crate::pipeline::artifacts::{CLUSTERING_REPORT, DEPENDENCY_DATABASE};
    use crate::pipeline::clusterer::COMPATIBILITY_FLAG;
    use crate::pipeline::outcome::FailureCause;
    use crate::pipeline::progress::NoopProgress;
    use crate::pipeline::request::Language;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::ports::{
        ClusterExit, ClusterOutput, Clusterer, FileSystem, PortError, ProcessOutput,
        ProcessRunner, ProcessSpec,
    };

    fn output_arg(spec: &ProcessSpec) -> &str {
        spec.args.iter().find_map(|a| a.to_str()?.strip_prefix("--output=")).unwrap()
    }

    /// Extractor stand-in: writes the database named by `--output=` on success.
    struct FakeExtractor {
        exit_code: i32,
        stderr: &'static str,
        calls: Arc<Mutex<Vec<ProcessSpec>>>,
    }

    impl ProcessRunner for FakeExtractor {
        fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, PortError> {
            self.calls.lock().unwrap().push(spec.clone());
            if self.exit_code == 0 {
                std::fs::write(output_arg(spec), "db")?;
            }
            Ok(ProcessOutput { exit_code: self.exit_code, stderr: self.stderr.to_string() })
        }
    }

    /// Clustering stand-in: records its arguments and writes the report.
    struct FakeClusterer {
        exit: ClusterExit,
        calls: Arc<Mutex<Vec<Vec<OsString>>>>,
    }

    impl Clusterer for FakeClusterer {
        fn cluster(&self, args: &[OsString]) -> Result<ClusterOutput, PortError> {
            self.calls.lock().unwrap().push(args.to_vec());
            if self.exit.is_success() {
                let at = args.iter().position(|a| a == "--output").unwrap();
                std::fs::write(&args[at + 1], "{}")?;
            }
            Ok(ClusterOutput { exit: self.exit, stderr: "cluster trace".into() })
        }
    }

    /// Live filesystem that refuses the selected operations.
    #[derive(Default)]
    struct RefusingFileSystem {
        refuse_create: bool,
        refuse_list: bool,
    }

    impl FileSystem for RefusingFileSystem {
        fn exists(&self, path: &Path) -> bool {
            LiveFileSystem.exists(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            LiveFileSystem.is_dir(path)
        }
        fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
            LiveFileSystem.remove_dir_all(path)
        }
        fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
            if self.refuse_create {
                return Err("read-only file system".into());
            }
            LiveFileSystem.create_dir_all(path)
        }
        fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
            if self.refuse_list {
                return Err("permission denied".into());
            }
            LiveFileSystem.list_dir(path)
        }
        fn set_executable(&self, path: &Path) -> Result<(), PortError> {
            LiveFileSystem.set_executable(path)
        }
    }

    struct Harness {
        _tmp: tempfile::TempDir,
        ctx: ServiceContext,
        extractor: PathBuf,
        request: PipelineRequest,
        extractor_calls: Arc<Mutex<Vec<ProcessSpec>>>,
        clusterer_calls: Arc<Mutex<Vec<Vec<OsString>>>>,
    }

    impl Harness {
        fn new(extract_exit: i32, extract_stderr: &'static str, cluster_exit: ClusterExit) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let project = tmp.path().join("project");
            std::fs::create_dir_all(project.join("src")).unwrap();
            std::fs::write(project.join("src/Test.java"), "class Test {}").unwrap();
            let extractor = tmp.path().join("resources/neodepends");
            std::fs::create_dir_all(extractor.parent().unwrap()).unwrap();
            std::fs::write(&extractor, "").unwrap();

            let extractor_calls = Arc::new(Mutex::new(Vec::new()));
            let clusterer_calls = Arc::new(Mutex::new(Vec::new()));
            let mut ctx = ServiceContext::live(&RunnerConfig::from_lookup(|_| None).unwrap());
            ctx.process = Box::new(FakeExtractor {
                exit_code: extract_exit,
                stderr: extract_stderr,
                calls: Arc::clone(&extractor_calls),
            });
            ctx.clusterer =
                Box::new(FakeClusterer { exit: cluster_exit, calls: Arc::clone(&clusterer_calls) });

            let request = PipelineRequest {
                source_directory: project,
                output_directory: tmp.path().join("out"),
                target_file: PathBuf::from("src/Test.java"),
                language: Language::Java,
                compatibility_mode: false,
            };
            Self { _tmp: tmp, ctx, extractor, request, extractor_calls, clusterer_calls }
        }

        fn run(&self) -> Result<PipelineResult, PipelineFailure> {
            Pipeline::new(&self.ctx, &self.extractor).run(&self.request, &NoopProgress)
        }

        fn out(&self, name: &str) -> PathBuf {
            self.request.output_directory.join(name)
        }
    }

    #[test]
    fn success_runs_both_stages_and_lists_artifacts() {
        let harness = Harness::new(0, "", ClusterExit::Exited(0));
        let result = harness.run().unwrap();

        assert_eq!(result.stage_outcomes.len(), 2);
        assert_eq!(result.stage_outcomes[0].stage, Stage::Extraction);
        assert_eq!(result.stage_outcomes[1].stage, Stage::Clustering);
        assert!(result.stage_outcomes.iter().all(|s| s.outcome.is_success()));

        let names: Vec<_> = result
            .produced_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![CLUSTERING_REPORT, DEPENDENCY_DATABASE]);
        assert!(result.warning.is_none());
    }

    #[test]
    fn clusterer_reads_the_database_the_extractor_wrote() {
        let harness = Harness::new(0, "", ClusterExit::Returned);
        harness.run().unwrap();

        let extract = harness.extractor_calls.lock().unwrap()[0].clone();
        let written = output_arg(&extract);
        let cluster = harness.clusterer_calls.lock().unwrap()[0].clone();
        assert_eq!(cluster[1], written);
        assert_eq!(Path::new(written), harness.out(DEPENDENCY_DATABASE));
    }

    #[test]
    fn extraction_failure_short_circuits() {
        let harness = Harness::new(2, "parse error", ClusterExit::Exited(0));
        let failure = harness.run().unwrap_err();

        assert_eq!(failure.failed_in, PipelineState::ExtractingDeps);
        assert!(matches!(
            &failure.error,
            PipelineError::Extraction(f) if f.cause == FailureCause::ExitCode(2)
        ));
        assert!(failure.error.diagnostic().unwrap().contains("parse error"));
        assert_eq!(failure.stage_outcomes.len(), 1);
        assert!(harness.clusterer_calls.lock().unwrap().is_empty());
        assert!(!harness.out(CLUSTERING_REPORT).exists());
    }

    #[test]
    fn clustering_failure_keeps_partial_artifacts() {
        let harness = Harness::new(0, "", ClusterExit::Exited(1));
        let failure = harness.run().unwrap_err();

        assert_eq!(failure.failed_in, PipelineState::Clustering);
        assert!(matches!(failure.error, PipelineError::Clustering(_)));
        assert_eq!(failure.error.diagnostic(), Some("cluster trace"));
        assert_eq!(failure.stage_outcomes.len(), 2);
        assert!(harness.out(DEPENDENCY_DATABASE).exists());
        assert!(!harness.out(CLUSTERING_REPORT).exists());
    }

    #[test]
    fn compatibility_flag_is_threaded_only_when_requested() {
        let mut harness = Harness::new(0, "", ClusterExit::Exited(0));
        harness.run().unwrap();
        harness.request.compatibility_mode = true;
        harness.run().unwrap();

        let calls = harness.clusterer_calls.lock().unwrap();
        assert!(!calls[0].iter().any(|a| a == COMPATIBILITY_FLAG));
        assert!(calls[1].iter().any(|a| a == COMPATIBILITY_FLAG));
    }

    #[test]
    fn missing_source_directory_fails_before_any_stage() {
        let mut harness = Harness::new(0, "", ClusterExit::Exited(0));
        harness.request.source_directory = harness.request.source_directory.join("nope");
        let failure = harness.run().unwrap_err();

        assert_eq!(failure.failed_in, PipelineState::Init);
        assert!(matches!(failure.error, PipelineError::Filesystem { .. }));
        assert!(harness.extractor_calls.lock().unwrap().is_empty());
        assert!(!harness.request.output_directory.exists());
    }

    #[test]
    fn rerun_wipes_previous_outputs() {
        let harness = Harness::new(0, "", ClusterExit::Exited(0));
        std::fs::create_dir_all(&harness.request.output_directory).unwrap();
        std::fs::write(harness.out("stale.txt"), "old").unwrap();

        let result = harness.run().unwrap();
        assert!(!harness.out("stale.txt").exists());
        assert_eq!(result.produced_files.len(), 2);
    }

    #[test]
    fn listing_failure_still_completes_with_a_warning() {
        let mut harness = Harness::new(0, "", ClusterExit::Exited(0));
        harness.ctx.fs = Box::new(RefusingFileSystem { refuse_list: true, ..Default::default() });

        let result = harness.run().unwrap();
        assert_eq!(result.stage_outcomes.len(), 2);
        assert!(result.stage_outcomes.iter().all(|s| s.outcome.is_success()));
        assert!(result.produced_files.is_empty());
        let warning = result.warning.unwrap();
        assert!(warning.message.contains("permission denied"));
        assert!(harness.out(DEPENDENCY_DATABASE).exists());
        assert!(harness.out(CLUSTERING_REPORT).exists());
    }

    #[test]
    fn prepare_failure_stops_before_extraction() {
        let mut harness = Harness::new(0, "", ClusterExit::Exited(0));
        harness.ctx.fs = Box::new(RefusingFileSystem { refuse_create: true, ..Default::default() });

        let failure = harness.run().unwrap_err();
        assert_eq!(failure.failed_in, PipelineState::Preparing);
        assert!(matches!(failure.error, PipelineError::Filesystem { .. }));
        assert!(failure.error.to_string().contains("read-only file system"));
        assert!(failure.stage_outcomes.is_empty());
        assert!(harness.extractor_calls.lock().unwrap().is_empty());
        assert!(harness.clusterer_calls.lock().unwrap().is_empty());
    }
}
