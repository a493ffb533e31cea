//! Live adapters for real external interactions.

pub mod clock;
pub mod clusterer;
pub mod filesystem;
pub mod process;
