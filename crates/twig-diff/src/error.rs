//! Error types for the diff crate.

use twig_types::ObjectId;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A file entry names a blob the store does not hold.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),

    /// The commit or its parent could not be loaded.
    #[error(transparent)]
    Ledger(#[from] twig_ledger::LedgerError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
