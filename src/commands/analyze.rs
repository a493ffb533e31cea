//! Implementation of the single analysis command.

use crate::config::RunnerConfig;
use crate::context::ServiceContext;
use crate::pipeline::{ConsoleProgress, Pipeline, PipelineFailure, PipelineRequest};

const RULE: &str = "============================================================";

/// Run extraction then clustering for `request`, printing progress to stdout.
///
/// # Errors
///
/// Returns an error string naming the failed stage and the time elapsed
/// until the failure. The stage's diagnostic text goes to stderr first.
pub fn run(
    ctx: &ServiceContext,
    config: &RunnerConfig,
    request: &PipelineRequest,
) -> Result<(), String> {
    println!("{RULE}");
    println!(" Deicide Suite - Unified NeoDepends + Deicide Runner");
    println!("{RULE}");

    let pipeline = Pipeline::new(ctx, config.extractor_program());
    let result = pipeline.run(request, &ConsoleProgress);
    println!("{RULE}");

    result.map(|_| ()).map_err(|failure| {
        report_failure(&failure);
        failure_message(&failure)
    })
}

fn report_failure(failure: &PipelineFailure) {
    if let Some(line) = failed_stage_line(failure) {
        eprintln!("{line}");
    }
    let (Some(stage), Some(diagnostic)) = (failure.error.stage(), failure.error.diagnostic()) else {
        return;
    };
    if !diagnostic.is_empty() {
        eprintln!("{} error:", stage.tool());
        eprint!("{diagnostic}");
        if !diagnostic.ends_with('\n') {
            eprintln!();
        }
    }
}

/// `✘ <tool> failed (<secs>s)` for the stage that stopped the run, if any.
fn failed_stage_line(failure: &PipelineFailure) -> Option<String> {
    let report = failure.stage_outcomes.last().filter(|r| !r.outcome.is_success())?;
    Some(format!(
        "✘ {} failed ({:.2}s)",
        report.stage.tool(),
        report.outcome.duration().as_secs_f64()
    ))
}

fn failure_message(failure: &PipelineFailure) -> String {
    format!("{}; failed after {:.2}s", failure.error, failure.elapsed.as_secs_f64())
}
