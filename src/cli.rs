//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::{Language, PipelineRequest};

/// Top-level CLI parser for `deicide-suite`.
#[derive(Debug, Parser)]
#[command(name = "deicide-suite", version, about = "Run NeoDepends + Deicide in one command")]
pub struct Cli {
    /// Path to the source-code directory (repo root).
    #[arg(long, value_name = "DIR")]
    pub project: PathBuf,

    /// Directory where outputs will be written. Existing contents are deleted.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// File inside the project to analyze (e.g. src/Test.java).
    #[arg(long, value_name = "PATH")]
    pub filename: PathBuf,

    /// Generate DV8-compatible outputs.
    #[arg(long)]
    pub dv8: bool,

    /// Programming language to analyze.
    #[arg(long, visible_alias = "lang", value_enum, default_value_t = Language::Java)]
    pub language: Language,
}

impl Cli {
    /// The pipeline request described by these arguments.
    #[must_use]
    pub fn to_request(&self) -> PipelineRequest {
        PipelineRequest {
            source_directory: self.project.clone(),
            output_directory: self.output_dir.clone(),
            target_file: self.filename.clone(),
            language: self.language,
            compatibility_mode: self.dv8,
        }
    }
}
