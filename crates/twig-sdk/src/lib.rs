//! High-level SDK for Twig.
//!
//! [`Repository`] is the entry point for applications embedding Twig: it
//! owns the `.Twig` directory layout and wires the object store, staging
//! area, HEAD, and commit chain together.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{RepoConfig, StagingConfig, StorageConfig};
pub use error::{SdkError, SdkResult};
pub use repository::{Repository, TWIG_DIR};

// Re-export key types
pub use twig_diff::{BlobDiff, ChangeKind, CommitShow, DiffRun, FileChange, FileShow};
pub use twig_index::{StagingEntry, StagingMode};
pub use twig_ledger::{CommitRecord, CommitSummary};
pub use twig_types::ObjectId;
