//! Recording adapter for the `ProcessRunner` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{PortError, ProcessOutput, ProcessRunner, ProcessSpec};

/// Records child-process runs while delegating to an inner runner.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, PortError> {
        let result = self.inner.run(spec);
        record_result(&self.recorder, "process", "run", spec, &result);
        result
    }
}
