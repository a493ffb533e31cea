//! Recording adapter for the `Clusterer` port.

use std::ffi::OsString;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ClusterOutput, Clusterer, PortError};

/// Records clustering engine calls while delegating to an inner engine.
pub struct RecordingClusterer {
    inner: Box<dyn Clusterer>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingClusterer {
    /// Creates a new recording clusterer wrapping the given implementation.
    pub fn new(inner: Box<dyn Clusterer>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ClusterInput<'a> {
    #[serde(serialize_with = "crate::ports::process::lossy_all")]
    args: &'a [OsString],
}

impl Clusterer for RecordingClusterer {
    fn cluster(&self, args: &[OsString]) -> Result<ClusterOutput, PortError> {
        let result = self.inner.cluster(args);
        record_result(&self.recorder, "clusterer", "cluster", &ClusterInput { args }, &result);
        result
    }
}
