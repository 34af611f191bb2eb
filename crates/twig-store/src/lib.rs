//! Content-addressed object storage for Twig.
//!
//! A hash-keyed object store analogous to git's `.git/objects/` directory,
//! without compression or fan-out: every object lives at
//! `objects/<40-hex-id>` and holds the raw bytes it was written with.
//!
//! Blobs (file contents) and commit records share the store. The store never
//! interprets object contents; callers decide how to read the bytes back.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one file per object under a directory
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes land via temp file + rename, so a reader never sees a torn object.
//! 3. Rewriting existing content is a no-op.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{atomic_write, FsObjectStore, FsStoreOptions};
pub use memory::InMemoryObjectStore;
pub use traits::ObjectStore;
