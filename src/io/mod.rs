//! I/O operations module
//!
//! Contains the durable-write primitive the prober measures, behind a
//! trait seam so tests can substitute failing storage.

pub mod disk;

pub use disk::{FsStorage, ProbeStorage};
