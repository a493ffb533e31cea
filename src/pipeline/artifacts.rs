//! Output directory lifecycle and fixed artifact naming.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::PipelineError;
use super::outcome::ReportingWarning;
use crate::context::ServiceContext;

/// File name of the dependency database written by the extractor.
pub const DEPENDENCY_DATABASE: &str = "dependencies.db";

/// File name of the clustering report written by the clustering engine.
pub const CLUSTERING_REPORT: &str = "deicide_clustering.json";

/// Where both stages read and write, derived from the output directory alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Extractor output, clustering input.
    pub dependency_database: PathBuf,
    /// Clustering output.
    pub clustering_report: PathBuf,
}

impl ArtifactPaths {
    /// Both artifact paths as siblings inside `output_directory`.
    #[must_use]
    pub fn for_output_dir(output_directory: &Path) -> Self {
        Self {
            dependency_database: output_directory.join(DEPENDENCY_DATABASE),
            clustering_report: output_directory.join(CLUSTERING_REPORT),
        }
    }
}

/// Files found in the output directory after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Entries directly inside the directory, sorted by name.
    pub files: Vec<PathBuf>,
    /// Set when the listing failed; `files` is then empty.
    pub warning: Option<ReportingWarning>,
}

/// Owns the output directory for the duration of a run.
///
/// This is the only component that deletes user-visible data.
pub struct ArtifactStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ArtifactStore<'a> {
    /// Creates a store working through `ctx.fs`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns `true` if `prepare` would destroy an existing directory.
    #[must_use]
    pub fn will_overwrite(&self, output_directory: &Path) -> bool {
        self.ctx.fs.exists(output_directory)
    }

    /// Deletes `output_directory` recursively if it exists, then recreates it
    /// (with any missing parents). No confirmation, no merge.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Filesystem`] if deletion or creation is denied.
    pub fn prepare(&self, output_directory: &Path) -> Result<(), PipelineError> {
        if self.ctx.fs.exists(output_directory) {
            debug!(path = %output_directory.display(), "removing existing output directory");
            self.ctx.fs.remove_dir_all(output_directory).map_err(|source| {
                PipelineError::Filesystem { path: output_directory.to_path_buf(), source }
            })?;
        }
        self.ctx.fs.create_dir_all(output_directory).map_err(|source| {
            PipelineError::Filesystem { path: output_directory.to_path_buf(), source }
        })
    }

    /// Lists what the run produced. Never fails: a listing error becomes a warning.
    #[must_use]
    pub fn enumerate(&self, output_directory: &Path) -> Enumeration {
        match self.ctx.fs.list_dir(output_directory) {
            Ok(mut names) => {
                names.sort();
                let files = names.into_iter().map(|name| output_directory.join(name)).collect();
                Enumeration { files, warning: None }
            }
            Err(e) => {
                warn!(path = %output_directory.display(), error = %e, "could not list outputs");
                Enumeration {
                    files: Vec::new(),
                    warning: Some(ReportingWarning {
                        path: output_directory.to_path_buf(),
                        message: e.to_string(),
                    }),
                }
            }
        }
    }
}
