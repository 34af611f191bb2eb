//! HEAD pointer management for Twig.
//!
//! HEAD is the single mutable root of the commit chain: a text file naming
//! the latest commit's object ID, or empty before the first commit. Every
//! commit object is otherwise immutable, so moving HEAD is the only way
//! history advances.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`fs`] -- File-backed [`FsRefStore`] over `.Twig/HEAD`
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use traits::RefStore;
