//! Replaying adapter for the `ProcessRunner` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{PortError, ProcessOutput, ProcessRunner, ProcessSpec};

/// Replays recorded child-process outcomes without spawning anything.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run(&self, _spec: &ProcessSpec) -> Result<ProcessOutput, PortError> {
        let output = next_output(&self.replayer, "process", "run");
        replay_result(&output, "process::run")
    }
}
