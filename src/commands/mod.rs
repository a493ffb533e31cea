//! Command dispatch and handlers.

pub mod analyze;

use uuid::Uuid;

use crate::cassette::session::RecordingSession;
use crate::cli::Cli;
use crate::config::RunnerConfig;
use crate::context::ServiceContext;

/// Dispatch parsed arguments to the analysis handler.
///
/// When `DEICIDE_RECORD` is set to a directory path, every extractor,
/// clusterer and clock interaction is recorded to per-port cassette files
/// under that directory.
///
/// # Errors
///
/// Returns an error string if configuration fails or the pipeline fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = RunnerConfig::from_env().map_err(|e| e.to_string())?;

    let (ctx, session) = if let Some(root) = &config.record_dir {
        let session = RecordingSession::new(root, &Uuid::new_v4().to_string())?;
        (ServiceContext::recording(&config, &session), Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = analyze::run(&ctx, &config, &cli.to_request());

    // Finish recording after the run completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
