//! The immutable description of one pipeline run.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Source languages the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    C,
    /// C++
    Cpp,
    /// Go
    Go,
    /// Java
    #[default]
    Java,
    /// JavaScript
    Javascript,
    /// Kotlin
    Kotlin,
    /// Python
    Python,
    /// Ruby
    Ruby,
    /// TypeScript
    Typescript,
}

impl Language {
    /// The selector passed to the extractor's `-l` flag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Java => "java",
            Self::Javascript => "javascript",
            Self::Kotlin => "kotlin",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Typescript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied parameters for one run. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Root of the source tree to analyze.
    pub source_directory: PathBuf,
    /// Directory that receives the artifacts; wiped at the start of the run.
    pub output_directory: PathBuf,
    /// File to decompose, relative to `source_directory`.
    pub target_file: PathBuf,
    /// Extractor language mode.
    pub language: Language,
    /// Emit the clustering report in the DV8-compatible format.
    pub compatibility_mode: bool,
}

impl PipelineRequest {
    /// Returns a copy with source and output directories made absolute.
    ///
    /// The target file stays relative: the clustering engine resolves it
    /// against the source tree recorded in the dependency database.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn resolved(&self) -> std::io::Result<Self> {
        Ok(Self {
            source_directory: absolute(&self.source_directory)?,
            output_directory: absolute(&self.output_directory)?,
            ..self.clone()
        })
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    // Canonical where possible so symlinked checkouts resolve like the shell does.
    match path.canonicalize() {
        Ok(canonical) => Ok(canonical),
        Err(_) => std::path::absolute(path),
    }
}
