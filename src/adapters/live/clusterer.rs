//! Live clustering engine adapters.
//!
//! [`ProcessClusterer`] runs the engine as a child process, so its exit can
//! only ever end the child. [`InProcessClusterer`] calls a library entry
//! point and traps both its exit signal and any panic.

use std::ffi::OsString;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::ports::clusterer::{ClusterExit, ClusterOutput, Clusterer, EngineExit};
use crate::ports::PortError;

/// Runs the clustering engine executable as an isolated child process.
pub struct ProcessClusterer {
    program: PathBuf,
}

impl ProcessClusterer {
    /// Creates an adapter that launches `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Clusterer for ProcessClusterer {
    fn cluster(&self, args: &[OsString]) -> Result<ClusterOutput, PortError> {
        debug!(program = %self.program.display(), ?args, "launching clustering engine");
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to launch {}: {e}", self.program.display()))?;

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        match output.status.code() {
            Some(code) => Ok(ClusterOutput { exit: ClusterExit::Exited(code), stderr }),
            None => Err(format!("clustering engine terminated by signal: {}\n{stderr}", output.status)
                .into()),
        }
    }
}

/// Library entry point of an in-process clustering engine.
pub type EngineEntry = dyn Fn(&[OsString]) -> Result<(), EngineExit> + Send + Sync;

/// Calls a clustering engine in-process behind an exit trap.
///
/// `Err(EngineExit)` from the entry point is the engine's termination signal
/// and becomes [`ClusterExit::Exited`]. A panic is an uncaught engine error.
pub struct InProcessClusterer {
    entry: Box<EngineEntry>,
}

impl InProcessClusterer {
    /// Wraps a library entry point.
    pub fn new<F>(entry: F) -> Self
    where
        F: Fn(&[OsString]) -> Result<(), EngineExit> + Send + Sync + 'static,
    {
        Self { entry: Box::new(entry) }
    }
}

impl Clusterer for InProcessClusterer {
    fn cluster(&self, args: &[OsString]) -> Result<ClusterOutput, PortError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.entry)(args))) {
            Ok(Ok(())) => Ok(ClusterOutput { exit: ClusterExit::Returned, stderr: String::new() }),
            Ok(Err(EngineExit { code })) => {
                Ok(ClusterOutput { exit: ClusterExit::Exited(code), stderr: String::new() })
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "clustering engine panicked");
                Err(format!("clustering engine raised an error: {message}").into())
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
