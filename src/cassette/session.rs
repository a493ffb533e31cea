//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Per-port `CassetteRecorder` instances for one recorded pipeline run.
///
/// Each port writes its own `<port>.cassette.yaml` inside a timestamped
/// directory under the configured recording root.
pub struct RecordingSession {
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for extractor process interactions.
    pub process: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clustering engine interactions.
    pub clusterer: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates `<root>/<timestamp>/` and one recorder per port.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path, run_id: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, run_id)))
        };

        Ok(Self {
            clock: make_recorder("clock"),
            process: make_recorder("process"),
            clusterer: make_recorder("clusterer"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette file and returns the session directory.
    ///
    /// Recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.clock, "clock")?;
        finish_one(self.process, "process")?;
        finish_one(self.clusterer, "clusterer")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_writes_one_cassette_per_port() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path(), "run-1").unwrap();
        assert!(session.output_dir().is_dir());

        let dir = session.finish().unwrap();
        for port in crate::cassette::PORTS {
            assert!(dir.join(format!("{port}.cassette.yaml")).is_file(), "missing {port}");
        }
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path(), "run-2").unwrap();
        let _held = Arc::clone(&session.process);

        let err = session.finish().unwrap_err();
        assert!(err.contains("process still has references"));
    }
}
