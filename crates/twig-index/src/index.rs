//! The file-backed staging area.
//!
//! Every operation reads the whole index file and, when mutating, replaces it
//! whole. There is no in-memory copy to go stale between calls; callers that
//! share one repository across threads serialize mutations above this layer.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use twig_store::atomic_write;
use twig_types::ObjectId;

use crate::entry::StagingEntry;
use crate::error::{IndexError, IndexResult};

/// How [`StagingArea::append`] treats a path that is already staged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StagingMode {
    /// Replace the hash of the existing entry, keeping its position.
    #[default]
    ReplacePath,
    /// Always push a new entry; the same path may be staged repeatedly.
    Append,
}

/// The staging area persisted at `.Twig/index`.
#[derive(Clone, Debug)]
pub struct StagingArea {
    path: PathBuf,
    mode: StagingMode,
    fsync: bool,
}

impl StagingArea {
    /// A staging area over the index file at `path`.
    pub fn new(path: impl Into<PathBuf>, mode: StagingMode) -> Self {
        Self {
            path: path.into(),
            mode,
            fsync: true,
        }
    }

    /// Toggle fsync on index replacement.
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> StagingMode {
        self.mode
    }

    /// Create the index file holding an empty sequence.
    ///
    /// Returns `false` without touching the file if it already exists.
    pub fn initialize(&self) -> IndexResult<bool> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        file.write_all(b"[]")?;
        if self.fsync {
            file.sync_all()?;
        }
        Ok(true)
    }

    /// Read the staged entries in staging order.
    pub fn load(&self) -> IndexResult<Vec<StagingEntry>> {
        let raw = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IndexError::CorruptIndex {
                path: self.path.clone(),
                reason: "index file is missing".into(),
            },
            _ => IndexError::Io(e),
        })?;

        serde_json::from_slice(&raw).map_err(|e| IndexError::CorruptIndex {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Stage `path` at `hash` and persist the full sequence.
    pub fn append(&self, path: &str, hash: ObjectId) -> IndexResult<()> {
        if path.is_empty() {
            return Err(IndexError::InvalidPath("empty path".to_string()));
        }

        let mut entries = self.load()?;
        let existing = match self.mode {
            StagingMode::ReplacePath => entries.iter_mut().find(|e| e.path == path),
            StagingMode::Append => None,
        };
        match existing {
            Some(entry) => entry.hash = hash,
            None => entries.push(StagingEntry::new(path, hash)),
        }

        self.persist(&entries)?;
        debug!(path, hash = %hash.short_hex(), staged = entries.len(), "staged file");
        Ok(())
    }

    /// Persist an empty sequence.
    pub fn clear(&self) -> IndexResult<()> {
        self.persist(&[])?;
        debug!("staging area cleared");
        Ok(())
    }

    /// Number of staged entries.
    pub fn len(&self) -> IndexResult<usize> {
        Ok(self.load()?.len())
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.load()?.is_empty())
    }

    /// Returns `true` if `path` has at least one staged entry.
    pub fn contains(&self, path: &str) -> IndexResult<bool> {
        Ok(self.load()?.iter().any(|e| e.path == path))
    }

    fn persist(&self, entries: &[StagingEntry]) -> IndexResult<()> {
        let data = serde_json::to_vec(entries).map_err(|e| IndexError::CorruptIndex {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        atomic_write(&self.path, &data, self.fsync)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_crypto::ContentHasher;

    fn make_area(mode: StagingMode) -> (tempfile::TempDir, StagingArea) {
        let dir = tempfile::tempdir().unwrap();
        let area = StagingArea::new(dir.path().join("index"), mode).with_fsync(false);
        assert!(area.initialize().unwrap());
        (dir, area)
    }

    fn oid(data: &[u8]) -> ObjectId {
        ContentHasher::hash(data)
    }

    #[test]
    fn new_area_is_empty() {
        let (_dir, area) = make_area(StagingMode::default());
        assert!(area.load().unwrap().is_empty());
        assert!(area.is_empty().unwrap());
        assert_eq!(fs::read_to_string(area.path()).unwrap(), "[]");
    }

    #[test]
    fn initialize_does_not_overwrite() {
        let (_dir, area) = make_area(StagingMode::default());
        area.append("a.txt", oid(b"a")).unwrap();
        assert!(!area.initialize().unwrap());
        assert_eq!(area.len().unwrap(), 1);
    }

    #[test]
    fn append_preserves_order() {
        let (_dir, area) = make_area(StagingMode::default());
        area.append("b.txt", oid(b"b")).unwrap();
        area.append("a.txt", oid(b"a")).unwrap();

        let entries = area.load().unwrap();
        assert_eq!(
            entries,
            vec![
                StagingEntry::new("b.txt", oid(b"b")),
                StagingEntry::new("a.txt", oid(b"a")),
            ]
        );
    }

    #[test]
    fn replace_path_mode_keeps_one_entry_per_path() {
        let (_dir, area) = make_area(StagingMode::ReplacePath);
        area.append("a.txt", oid(b"v1")).unwrap();
        area.append("b.txt", oid(b"b")).unwrap();
        area.append("a.txt", oid(b"v2")).unwrap();

        let entries = area.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], StagingEntry::new("a.txt", oid(b"v2")));
        assert_eq!(entries[1].path, "b.txt");
    }

    #[test]
    fn append_mode_keeps_duplicates() {
        let (_dir, area) = make_area(StagingMode::Append);
        area.append("a.txt", oid(b"v1")).unwrap();
        area.append("a.txt", oid(b"v2")).unwrap();

        let entries = area.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].hash, oid(b"v1"));
        assert_eq!(entries[1].hash, oid(b"v2"));
    }

    #[test]
    fn append_rejects_empty_path() {
        let (_dir, area) = make_area(StagingMode::default());
        let result = area.append("", oid(b"x"));
        assert!(matches!(result, Err(IndexError::InvalidPath(_))));
    }

    #[test]
    fn clear_persists_empty_sequence() {
        let (_dir, area) = make_area(StagingMode::default());
        area.append("a.txt", oid(b"a")).unwrap();
        area.clear().unwrap();
        assert!(area.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(area.path()).unwrap(), "[]");
    }

    #[test]
    fn contains_reports_staged_paths() {
        let (_dir, area) = make_area(StagingMode::default());
        area.append("a.txt", oid(b"a")).unwrap();
        assert!(area.contains("a.txt").unwrap());
        assert!(!area.contains("b.txt").unwrap());
    }

    #[test]
    fn garbage_index_is_corrupt_not_empty() {
        let (_dir, area) = make_area(StagingMode::default());
        fs::write(area.path(), b"{not json").unwrap();
        assert!(matches!(area.load(), Err(IndexError::CorruptIndex { .. })));
        // Mutations must not paper over the damage either.
        assert!(matches!(
            area.append("a.txt", oid(b"a")),
            Err(IndexError::CorruptIndex { .. })
        ));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let (_dir, area) = make_area(StagingMode::default());
        fs::write(area.path(), br#"[{"path":"a.txt","hash":"xyz"}]"#).unwrap();
        assert!(matches!(area.load(), Err(IndexError::CorruptIndex { .. })));
    }

    #[test]
    fn missing_index_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let area = StagingArea::new(dir.path().join("index"), StagingMode::default());
        assert!(matches!(area.load(), Err(IndexError::CorruptIndex { .. })));
    }

    #[test]
    fn reads_index_written_by_other_clients() {
        let (_dir, area) = make_area(StagingMode::default());
        fs::write(
            area.path(),
            br#"[{"path":"sample.txt","hash":"2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"}]"#,
        )
        .unwrap();
        let entries = area.load().unwrap();
        assert_eq!(entries[0].path, "sample.txt");
        assert_eq!(entries[0].hash, oid(b"hello world"));
    }
}
