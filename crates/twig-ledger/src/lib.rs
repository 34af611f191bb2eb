//! Commit chain for Twig.
//!
//! This crate is the heart of Twig. It provides:
//! - [`CommitRecord`], the typed, validating form of a stored commit object
//! - [`CommitChain`], which writes commits, advances HEAD, clears staging,
//!   and walks history newest-first
//!
//! A commit's ID is the hash of its own serialized bytes, and those bytes
//! include the parent's ID. A commit can therefore only name parents that
//! already existed when it was written, so a chain built through
//! [`CommitChain`] is acyclic. A store edited by hand can still loop; history
//! walks report that as [`LedgerError::CycleDetected`].

pub mod chain;
pub mod error;
pub mod records;

pub use chain::CommitChain;
pub use error::{LedgerError, LedgerResult};
pub use records::{CommitRecord, CommitSummary};
