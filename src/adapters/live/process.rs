//! Live process runner using `std::process::Command`.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::ports::process::{ProcessOutput, ProcessRunner, ProcessSpec};
use crate::ports::PortError;

/// Live process runner that spawns real child processes.
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, PortError> {
        debug!(program = %spec.program.display(), args = ?spec.args, "spawning child process");
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", spec.program.display()))?;

        // wait_with_output reads stderr to EOF before reaping the child.
        let output = child.wait_with_output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
