//! User-facing progress output, kept apart from structured logging.

use std::path::PathBuf;
use std::time::Duration;

use super::outcome::{ReportingWarning, Stage};

/// Events emitted by the pipeline while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// An existing output directory is about to be destroyed.
    Overwriting {
        /// Directory that will be wiped.
        output_directory: PathBuf,
    },
    /// A stage is starting.
    StageStarted {
        /// The stage.
        stage: Stage,
    },
    /// A stage completed successfully.
    StageFinished {
        /// The stage.
        stage: Stage,
        /// How long it took.
        duration: Duration,
        /// The artifact it produced.
        artifact: PathBuf,
    },
    /// The run finished; these files are in the output directory.
    Summary {
        /// Produced files, sorted by name.
        files: Vec<PathBuf>,
        /// Set when the listing failed.
        warning: Option<ReportingWarning>,
        /// Total run time.
        total: Duration,
        /// The output directory.
        output_directory: PathBuf,
    },
}

/// Receives [`ProgressEvent`]s.
pub trait ProgressReporter {
    /// Handles one event.
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Prints progress lines to stdout.
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn step(stage: Stage) -> u8 {
        match stage {
            Stage::Extraction => 1,
            Stage::Clustering => 2,
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Overwriting { output_directory } => {
                println!(
                    "Warning: output directory exists, overwriting: {}",
                    output_directory.display()
                );
            }
            ProgressEvent::StageStarted { stage } => {
                println!("\n[{}/3] Running {}…", Self::step(stage), stage.tool());
            }
            ProgressEvent::StageFinished { stage, duration, artifact } => {
                println!(
                    "✔ {} complete ({:.2}s): {}",
                    stage.tool(),
                    duration.as_secs_f64(),
                    artifact.display()
                );
            }
            ProgressEvent::Summary { files, warning, total, output_directory } => {
                println!("\n[3/3] Output Summary");
                println!("✔ Files Generated:");
                for file in &files {
                    println!("   • {}", file.display());
                }
                if let Some(warning) = warning {
                    println!("Warning: {warning}");
                }
                println!("\nAnalysis complete in {:.2}s!", total.as_secs_f64());
                println!("Outputs saved in: {}", output_directory.display());
            }
        }
    }
}
