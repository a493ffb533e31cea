//! Process runner port for invoking external executables.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

use super::PortError;

/// A fully-specified child process invocation.
///
/// Arguments are OS strings so paths reach the child byte-for-byte. The
/// serialized form (used in cassettes) is lossy UTF-8 and only descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    /// Executable to launch.
    #[serde(serialize_with = "lossy")]
    pub program: PathBuf,
    /// Arguments passed verbatim.
    #[serde(serialize_with = "lossy_all")]
    pub args: Vec<OsString>,
}

/// Builds a `<flag><value>` argument without a UTF-8 round trip.
#[must_use]
pub fn joined_arg(flag: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}

#[allow(clippy::ptr_arg)]
fn lossy<S: Serializer>(value: &PathBuf, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string_lossy())
}

pub(crate) fn lossy_all<S: Serializer>(
    values: &[OsString],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.to_string_lossy()))
}

/// What the orchestrator keeps from a finished child process.
///
/// Standard output is discarded by the runner and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Exit status of the process; `-1` when it was killed by a signal.
    pub exit_code: i32,
    /// The captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns `true` for a zero exit status.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns a child process and blocks until it exits.
pub trait ProcessRunner: Send + Sync {
    /// Runs the process, discarding its stdout and capturing its stderr.
    ///
    /// Standard error must be drained while the child is still running so
    /// that a chatty child cannot block on a full pipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, PortError>;
}
