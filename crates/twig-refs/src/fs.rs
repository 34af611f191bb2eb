//! File-backed HEAD store.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use twig_store::atomic_write;
use twig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::traits::RefStore;

/// HEAD stored as a text file holding a hex object ID, or empty.
#[derive(Clone, Debug)]
pub struct FsRefStore {
    path: PathBuf,
    fsync: bool,
}

impl FsRefStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fsync: true,
        }
    }

    /// Toggle fsync on HEAD replacement.
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty HEAD file.
    ///
    /// Returns `false` without touching the file if it already exists.
    pub fn initialize(&self) -> Result<bool> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl RefStore for FsRefStore {
    fn head(&self) -> Result<Option<ObjectId>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        ObjectId::from_hex(trimmed)
            .map(Some)
            .map_err(|e| RefError::CorruptHead {
                content: trimmed.to_string(),
                reason: e.to_string(),
            })
    }

    fn set_head(&self, commit: &ObjectId) -> Result<()> {
        atomic_write(&self.path, commit.to_hex().as_bytes(), self.fsync)?;
        debug!(head = %commit.short_hex(), "HEAD moved");
        Ok(())
    }
}
