//! Staging index for Twig.
//!
//! Holds the ordered list of `(path, hash)` snapshots that the next commit
//! will record, persisted as a JSON array in `.Twig/index`.
//!
//! # Key Types
//!
//! - [`StagingArea`] -- The file-backed staging area
//! - [`StagingEntry`] -- One staged file snapshot
//! - [`StagingMode`] -- Whether re-adding a path replaces or duplicates it

pub mod entry;
pub mod error;
pub mod index;

pub use entry::StagingEntry;
pub use error::{IndexError, IndexResult};
pub use index::{StagingArea, StagingMode};
