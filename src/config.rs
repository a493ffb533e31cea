//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;

use thiserror::Error;

/// File name of the bundled dependency extractor inside the resources directory.
pub const EXTRACTOR_BINARY: &str = "neodepends";

/// Default clustering engine program, resolved through `PATH`.
pub const DEFAULT_CLUSTERER: &str = "deicide";

/// Errors raised while assembling [`RunnerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The resources directory could not be derived from the running executable.
    #[error("cannot locate bundled resources (set DEICIDE_RESOURCES): {0}")]
    ExecutableLocation(#[source] std::io::Error),

    /// A variable was set to an empty string.
    #[error("environment variable {var} is set but empty")]
    Empty {
        /// Name of the offending variable.
        var: &'static str,
    },
}

/// Where the external stages live and whether to record this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Directory holding the bundled extractor (`DEICIDE_RESOURCES`).
    pub resources_dir: PathBuf,
    /// Clustering engine program (`DEICIDE_CLUSTERER`).
    pub clusterer_program: PathBuf,
    /// Cassette recording root, when recording is enabled (`DEICIDE_RECORD`).
    pub record_dir: Option<PathBuf>,
}

impl RunnerConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is empty or the resources directory
    /// cannot be located.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`RunnerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &'static str| -> Result<Option<PathBuf>, ConfigError> {
            match lookup(var) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
                Some(value) => Ok(Some(PathBuf::from(value))),
                None => Ok(None),
            }
        };

        let resources_dir = match non_empty("DEICIDE_RESOURCES")? {
            Some(dir) => dir,
            None => default_resources_dir()?,
        };
        let clusterer_program =
            non_empty("DEICIDE_CLUSTERER")?.unwrap_or_else(|| PathBuf::from(DEFAULT_CLUSTERER));
        let record_dir = non_empty("DEICIDE_RECORD")?;

        Ok(Self { resources_dir, clusterer_program, record_dir })
    }

    /// Full path of the bundled extractor executable.
    #[must_use]
    pub fn extractor_program(&self) -> PathBuf {
        self.resources_dir.join(EXTRACTOR_BINARY)
    }
}

/// `resources/` next to the running executable.
fn default_resources_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ExecutableLocation)?;
    let dir = exe.parent().map(PathBuf::from).unwrap_or_default();
    Ok(dir.join("resources"))
}
