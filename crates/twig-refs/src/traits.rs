//! The [`RefStore`] trait defining the HEAD storage interface.

use twig_types::ObjectId;

use crate::error::Result;

/// Storage backend for the HEAD pointer.
///
/// Implementations must be thread-safe (`Send + Sync`) and replace HEAD
/// atomically: a reader sees either the previous commit or the new one.
pub trait RefStore: Send + Sync {
    /// Read the current HEAD.
    ///
    /// Returns `Ok(None)` when no commit has been recorded yet, including
    /// when HEAD has never been written. Absence is not an error.
    fn head(&self) -> Result<Option<ObjectId>>;

    /// Point HEAD at `commit`.
    fn set_head(&self, commit: &ObjectId) -> Result<()>;
}
