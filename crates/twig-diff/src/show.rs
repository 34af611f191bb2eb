//! Per-file view of a commit against its parent.

use tracing::debug;
use twig_ledger::{CommitChain, CommitRecord};
use twig_store::ObjectStore;
use twig_types::ObjectId;

use crate::blob_diff::{diff_blobs, BlobDiff};
use crate::error::{DiffError, DiffResult};

/// How a file in a commit relates to the parent commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileChange {
    /// The commit has no parent; nothing to compare against.
    RootCommit,
    /// The parent does not contain this path.
    Added,
    /// The parent contains this path; the diff may still be empty.
    Modified(BlobDiff),
}

/// One file of a commit with its content and change against the parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileShow {
    pub path: String,
    pub hash: ObjectId,
    pub content: Vec<u8>,
    pub change: FileChange,
}

/// Everything `show` prints for one commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitShow {
    pub id: ObjectId,
    pub record: CommitRecord,
    pub files: Vec<FileShow>,
}

/// The content of `path` as recorded in `record`.
///
/// Returns `Ok(None)` when the commit does not contain the path.
pub fn resolve_file_content(
    store: &dyn ObjectStore,
    record: &CommitRecord,
    path: &str,
) -> DiffResult<Option<Vec<u8>>> {
    match record.file(path) {
        Some(entry) => load_blob(store, &entry.hash).map(Some),
        None => Ok(None),
    }
}

/// Resolve every file of commit `id` and diff it against the parent commit.
pub fn show_commit(
    chain: &CommitChain,
    store: &dyn ObjectStore,
    id: &ObjectId,
) -> DiffResult<CommitShow> {
    let record = chain.get_commit(id)?;
    let parent = match record.parent {
        Some(parent_id) => Some(chain.get_commit(&parent_id)?),
        None => None,
    };

    let mut files = Vec::with_capacity(record.files.len());
    for entry in &record.files {
        let content = load_blob(store, &entry.hash)?;
        let change = match &parent {
            None => FileChange::RootCommit,
            Some(parent) => match resolve_file_content(store, parent, &entry.path)? {
                None => FileChange::Added,
                Some(old) => FileChange::Modified(diff_blobs(&old, &content)),
            },
        };
        files.push(FileShow {
            path: entry.path.clone(),
            hash: entry.hash,
            content,
            change,
        });
    }

    debug!(commit = %id.short_hex(), files = files.len(), "resolved commit");
    Ok(CommitShow {
        id: *id,
        record,
        files,
    })
}

fn load_blob(store: &dyn ObjectStore, id: &ObjectId) -> DiffResult<Vec<u8>> {
    store.read(id)?.ok_or(DiffError::ObjectNotFound(*id))
}
