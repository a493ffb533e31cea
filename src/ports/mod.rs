//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline core and an
//! external system (time, filesystem, the extractor process, the
//! clustering engine). Implementations live in `src/adapters/`.

pub mod clock;
pub mod clusterer;
pub mod filesystem;
pub mod process;

pub use clock::Clock;
pub use clusterer::{ClusterExit, ClusterOutput, Clusterer, EngineExit};
pub use filesystem::FileSystem;
pub use process::{joined_arg, ProcessOutput, ProcessRunner, ProcessSpec};

/// Error type shared by all port methods.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
