//! In-memory HEAD store for testing and ephemeral use.

use std::sync::RwLock;

use twig_types::ObjectId;

use crate::error::Result;
use crate::traits::RefStore;

/// An in-memory implementation of [`RefStore`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    head: RwLock<Option<ObjectId>>,
}

impl InMemoryRefStore {
    /// Create a store with no HEAD set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn head(&self) -> Result<Option<ObjectId>> {
        Ok(*self.head.read().expect("lock poisoned"))
    }

    fn set_head(&self, commit: &ObjectId) -> Result<()> {
        *self.head.write().expect("lock poisoned") = Some(*commit);
        Ok(())
    }
}
