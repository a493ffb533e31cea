//! Cassette format for recording and replaying external-stage interactions.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

/// Port names used as cassette keys and per-port file stems.
pub const PORTS: [&str; 3] = ["clock", "process", "clusterer"];
