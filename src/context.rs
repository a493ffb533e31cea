//! Service context bundling all port trait objects.

use std::ffi::OsString;
use std::path::Path;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::clusterer::ProcessClusterer;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::process::LiveProcessRunner;
use crate::adapters::recording::clock::RecordingClock;
use crate::adapters::recording::clusterer::RecordingClusterer;
use crate::adapters::recording::process::RecordingProcessRunner;
use crate::adapters::replaying::{ReplayingClock, ReplayingClusterer, ReplayingProcessRunner};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::RunnerConfig;
use crate::ports::clock::Clock;
use crate::ports::clusterer::{ClusterOutput, Clusterer};
use crate::ports::filesystem::FileSystem;
use crate::ports::process::{ProcessOutput, ProcessRunner, ProcessSpec};
use crate::ports::PortError;

/// Bundles the port trait objects one pipeline run needs.
///
/// Constructors wire up live, recording or replaying adapters. The
/// filesystem is always live: the artifact store has to touch real disk.
pub struct ServiceContext {
    /// Clock used to time stages.
    pub clock: Box<dyn Clock>,
    /// Filesystem for output-directory management.
    pub fs: Box<dyn FileSystem>,
    /// Runner for the extractor child process.
    pub process: Box<dyn ProcessRunner>,
    /// Clustering engine boundary.
    pub clusterer: Box<dyn Clusterer>,
}

impl ServiceContext {
    /// Creates a live context with real adapters.
    #[must_use]
    pub fn live(config: &RunnerConfig) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            process: Box::new(LiveProcessRunner),
            clusterer: Box::new(ProcessClusterer::new(&config.clusterer_program)),
        }
    }

    /// Creates a live context whose external interactions are captured by `session`.
    ///
    /// The session can only be finished after this context is dropped.
    #[must_use]
    pub fn recording(config: &RunnerConfig, session: &RecordingSession) -> Self {
        let live = Self::live(config);
        Self {
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            fs: live.fs,
            process: Box::new(RecordingProcessRunner::new(live.process, session.process.clone())),
            clusterer: Box::new(RecordingClusterer::new(
                live.clusterer,
                session.clusterer.clone(),
            )),
        }
    }

    /// Creates a replaying context from a single cassette file.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(LiveFileSystem),
            process: Box::new(ReplayingProcessRunner::new(CassetteReplayer::new(&cassette))),
            clusterer: Box::new(ReplayingClusterer::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from a recording session directory.
    ///
    /// Ports without a cassette file panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any present cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            fs: Box::new(LiveFileSystem),
            process: match replayers.process {
                Some(r) => Box::new(ReplayingProcessRunner::new(r)),
                None => Box::new(PanickingProcessRunner),
            },
            clusterer: match replayers.clusterer {
                Some(r) => Box::new(ReplayingClusterer::new(r)),
                None => Box::new(PanickingClusterer),
            },
        })
    }
}

// --- Panicking adapters for ports without a cassette ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingProcessRunner;
impl ProcessRunner for PanickingProcessRunner {
    fn run(&self, _spec: &ProcessSpec) -> Result<ProcessOutput, PortError> {
        panic!("ProcessRunner port not configured in CassetteConfig: no cassette loaded for process");
    }
}

struct PanickingClusterer;
impl Clusterer for PanickingClusterer {
    fn cluster(&self, _args: &[OsString]) -> Result<ClusterOutput, PortError> {
        panic!("Clusterer port not configured in CassetteConfig: no cassette loaded for clusterer");
    }
}
