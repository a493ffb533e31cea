//! Clustering engine port.
//!
//! The engine's own contract conflates "finished" with "terminate the
//! process". This port only ever hands back a value: adapters must contain
//! the engine's exit behind a process boundary or an exit trap.

use std::ffi::OsString;

use serde::{Deserialize, Serialize};

use super::PortError;

/// How the clustering engine finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterExit {
    /// The entry point returned normally.
    Returned,
    /// The engine signalled termination with this status code.
    Exited(i32),
}

impl ClusterExit {
    /// Returns `true` for a normal return or a zero termination code.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Returned | Self::Exited(0))
    }
}

/// Result of one clustering engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterOutput {
    /// How the engine finished.
    pub exit: ClusterExit,
    /// Diagnostic text the engine wrote to its error stream, if captured.
    pub stderr: String,
}

/// Termination signal raised by an in-process engine entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    /// Status code the engine asked to exit with.
    pub code: i32,
}

/// Invokes the clustering engine with an argument vector.
pub trait Clusterer: Send + Sync {
    /// Runs the engine to completion.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine could not be started or failed
    /// outside its own exit convention (crash, signal, panic).
    fn cluster(&self, args: &[OsString]) -> Result<ClusterOutput, PortError>;
}
