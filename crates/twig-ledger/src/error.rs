use twig_types::ObjectId;

/// Errors produced by commit chain operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no commit found with hash: {0}")]
    CommitNotFound(ObjectId),

    #[error("corrupt commit record {id}: {reason}")]
    CorruptCommitRecord { id: ObjectId, reason: String },

    #[error("staged file {path} references missing object {id}")]
    MissingObject { path: String, id: ObjectId },

    #[error("commit chain revisits {0}")]
    CycleDetected(ObjectId),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] twig_index::IndexError),

    #[error("ref error: {0}")]
    Ref(#[from] twig_refs::RefError),
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
