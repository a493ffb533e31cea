//! Replaying adapter for the `Clusterer` port.

use std::ffi::OsString;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ClusterOutput, Clusterer, PortError};

/// Replays recorded clustering engine results.
pub struct ReplayingClusterer {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClusterer {
    /// Creates a new replaying clusterer from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clusterer for ReplayingClusterer {
    fn cluster(&self, _args: &[OsString]) -> Result<ClusterOutput, PortError> {
        let output = next_output(&self.replayer, "clusterer", "cluster");
        replay_result(&output, "clusterer::cluster")
    }
}
