use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("already initialized the .Twig folder at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("not a twig repository (no .Twig/HEAD under {})", .0.display())]
    NotInitialized(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] twig_index::IndexError),

    #[error("ref error: {0}")]
    Ref(#[from] twig_refs::RefError),

    #[error(transparent)]
    Ledger(#[from] twig_ledger::LedgerError),

    #[error(transparent)]
    Diff(#[from] twig_diff::DiffError),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SdkError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
