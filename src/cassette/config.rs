//! Per-port cassette selection for replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path get a panicking
/// adapter during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the process port cassette file.
    pub process: Option<PathBuf>,
    /// Path to the clusterer port cassette file.
    pub clusterer: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the process port.
    pub process: Option<CassetteReplayer>,
    /// Replayer for the clusterer port.
    pub clusterer: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Picks up whichever `<port>.cassette.yaml` files exist in a
    /// recording session directory.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let pick = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.is_file().then_some(path)
        };
        Self { clock: pick("clock"), process: pick("process"), clusterer: pick("clusterer") }
    }

    fn load(path: &Path) -> Result<CassetteReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?))
    }

    /// Loads all configured cassette files.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            clock: self.clock.as_deref().map(Self::load).transpose()?,
            process: self.process.as_deref().map(Self::load).transpose()?,
            clusterer: self.clusterer.as_deref().map(Self::load).transpose()?,
        })
    }
}
