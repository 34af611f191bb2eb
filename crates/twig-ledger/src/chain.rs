//! The linear commit chain: commit records linked by parent ids, one HEAD.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use twig_index::{StagingArea, StagingEntry};
use twig_refs::RefStore;
use twig_store::ObjectStore;
use twig_types::ObjectId;

use crate::error::{LedgerError, LedgerResult};
use crate::records::{CommitRecord, CommitSummary};

/// Creates and walks commits over an object store and a HEAD pointer.
#[derive(Clone)]
pub struct CommitChain {
    store: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl CommitChain {
    pub fn new(store: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { store, refs }
    }

    /// The id HEAD points at, or `None` before the first commit.
    pub fn current_head(&self) -> LedgerResult<Option<ObjectId>> {
        Ok(self.refs.head()?)
    }

    /// Record `files` as a new commit on top of HEAD and advance HEAD to it.
    pub fn commit_files(&self, message: &str, files: Vec<StagingEntry>) -> LedgerResult<ObjectId> {
        self.commit_files_at(message, files, Utc::now())
    }

    /// [`commit_files`](Self::commit_files) with an explicit timestamp.
    pub fn commit_files_at(
        &self,
        message: &str,
        files: Vec<StagingEntry>,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<ObjectId> {
        for entry in &files {
            if !self.store.exists(&entry.hash)? {
                return Err(LedgerError::MissingObject {
                    path: entry.path.clone(),
                    id: entry.hash,
                });
            }
        }

        let parent = self.current_head()?;
        let record = CommitRecord::new(timestamp, message, files, parent);
        let id = self.store.write(&record.to_bytes()?)?;
        self.refs.set_head(&id)?;

        info!(
            commit = %id.short_hex(),
            parent = ?parent.map(|p| p.short_hex()),
            files = record.files.len(),
            "created commit"
        );
        Ok(id)
    }

    /// Commit everything in `staging`, then empty it.
    ///
    /// The record is stored and HEAD moved before the index is cleared, so an
    /// interruption leaves the entries staged rather than lost.
    pub fn commit(&self, message: &str, staging: &StagingArea) -> LedgerResult<ObjectId> {
        let files = staging.load()?;
        let id = self.commit_files(message, files)?;
        staging.clear()?;
        Ok(id)
    }

    /// Load and decode the commit stored under `id`.
    pub fn get_commit(&self, id: &ObjectId) -> LedgerResult<CommitRecord> {
        let data = self
            .store
            .read(id)?
            .ok_or(LedgerError::CommitNotFound(*id))?;
        CommitRecord::from_bytes(id, &data)
    }

    /// Every commit reachable from HEAD, newest first.
    pub fn log(&self) -> LedgerResult<Vec<CommitSummary>> {
        self.history(None)
    }

    /// Like [`log`](Self::log), stopping after `limit` commits when given.
    pub fn history(&self, limit: Option<usize>) -> LedgerResult<Vec<CommitSummary>> {
        let mut summaries = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.current_head()?;

        while let Some(id) = cursor {
            if limit.is_some_and(|max| summaries.len() >= max) {
                break;
            }
            if !seen.insert(id) {
                return Err(LedgerError::CycleDetected(id));
            }
            let record = self.get_commit(&id)?;
            cursor = record.parent;
            summaries.push(record.summary(id));
        }

        debug!(commits = summaries.len(), "walked history");
        Ok(summaries)
    }
}

impl std::fmt::Debug for CommitChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitChain").finish_non_exhaustive()
    }
}
