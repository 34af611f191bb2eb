//! Diff engine for Twig.
//!
//! Computes line-level deltas between two versions of a file and resolves a
//! file's content across a commit and its parent.
//!
//! # Key Types
//!
//! - [`DiffRun`] / [`ChangeKind`] -- a maximal run of equal, added, or removed lines
//! - [`BlobDiff`] -- the diff of two byte blobs
//! - [`CommitShow`] / [`FileShow`] / [`FileChange`] -- per-file view of a commit

pub mod blob_diff;
pub mod error;
pub mod show;

pub use blob_diff::{diff_blobs, diff_text, BlobDiff, ChangeKind, DiffRun};
pub use error::{DiffError, DiffResult};
pub use show::{resolve_file_content, show_commit, CommitShow, FileChange, FileShow};
