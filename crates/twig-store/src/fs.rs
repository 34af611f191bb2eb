use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use twig_crypto::ContentHasher;
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Durability and integrity knobs for [`FsObjectStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FsStoreOptions {
    /// `fsync` each object before it is renamed into place.
    pub fsync: bool,
    /// Re-hash object bytes on read and reject mismatches.
    pub verify_reads: bool,
}

impl Default for FsStoreOptions {
    fn default() -> Self {
        Self {
            fsync: true,
            verify_reads: true,
        }
    }
}

/// Object store keeping one file per object in a flat directory.
///
/// Layout: `<dir>/<40-hex-id>`, file contents are the raw object bytes.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    dir: PathBuf,
    options: FsStoreOptions,
}

impl FsObjectStore {
    /// Open a store over an existing objects directory.
    pub fn new(dir: impl Into<PathBuf>, options: FsStoreOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    /// The directory objects are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// On-disk location of an object.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        let data = match fs::read(self.object_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if self.options.verify_reads && !ContentHasher::verify(&data, id) {
            let computed = ContentHasher::hash(&data);
            warn!(id = %id, computed = %computed, "object failed hash verification");
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(data))
    }

    fn write(&self, data: &[u8]) -> StoreResult<ObjectId> {
        let id = ContentHasher::hash(data);
        let path = self.object_path(&id);
        if path.exists() {
            debug!(id = %id.short_hex(), "object already stored");
            return Ok(id);
        }

        atomic_write(&path, data, self.options.fsync)?;
        debug!(id = %id.short_hex(), len = data.len(), "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

/// Replace `target` with `data` via a sibling temp file and a rename.
///
/// Readers observe either the old file or the complete new one. With `fsync`
/// set, the temp file is synced before the rename and the directory after it.
pub fn atomic_write(target: &Path, data: &[u8], fsync: bool) -> io::Result<()> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    if fsync {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(target).map_err(|e| e.error)?;
    if fsync {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), FsStoreOptions::default());
        (dir, store)
    }

    fn object_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn write_places_object_under_hex_id() {
        let (dir, store) = temp_store();
        let id = store.write(b"hello world").unwrap();
        assert_eq!(id.to_hex(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");

        let on_disk = fs::read(dir.path().join(id.to_hex())).unwrap();
        assert_eq!(on_disk, b"hello world");
    }

    #[test]
    fn write_is_idempotent() {
        let (dir, store) = temp_store();
        let id1 = store.write(b"same").unwrap();
        let id2 = store.write(b"same").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(object_count(dir.path()), 1);
    }

    #[test]
    fn read_roundtrip_and_missing() {
        let (_dir, store) = temp_store();
        let id = store.write(b"payload").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"payload");
        assert!(store.exists(&id).unwrap());

        let absent = ContentHasher::hash(b"absent");
        assert!(store.read(&absent).unwrap().is_none());
        assert!(!store.exists(&absent).unwrap());
        assert!(matches!(store.get(&absent), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn tampered_object_fails_verification() {
        let (_dir, store) = temp_store();
        let id = store.write(b"original").unwrap();
        fs::write(store.object_path(&id), b"tampered").unwrap();

        let err = store.read(&id).unwrap_err();
        let expected = ContentHasher::hash(b"tampered");
        assert!(matches!(
            err,
            StoreError::HashMismatch { id: bad, computed } if bad == id && computed == expected
        ));
    }

    #[test]
    fn verification_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(
            dir.path(),
            FsStoreOptions {
                fsync: false,
                verify_reads: false,
            },
        );
        let id = store.write(b"original").unwrap();
        fs::write(store.object_path(&id), b"tampered").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"tampered");
    }

    #[test]
    fn ids_are_stable_across_store_instances() {
        let (dir, store) = temp_store();
        let id = store.write(b"persisted").unwrap();
        drop(store);

        let reopened = FsObjectStore::new(dir.path(), FsStoreOptions::default());
        assert_eq!(reopened.hash(b"persisted"), id);
        assert_eq!(reopened.get(&id).unwrap(), b"persisted");
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("HEAD");
        atomic_write(&target, b"first", true).unwrap();
        atomic_write(&target, b"second", false).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert_eq!(object_count(dir.path()), 1);
    }

    #[test]
    fn atomic_write_with_fsync_lands_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("objects");
        fs::create_dir(&nested).unwrap();
        let target = nested.join("blob");

        atomic_write(&target, b"synced", true).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"synced");
        assert_eq!(object_count(&nested), 1);
    }

    #[test]
    fn atomic_write_with_fsync_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("absent").join("blob");
        assert!(atomic_write(&target, b"x", true).is_err());
        assert!(!target.exists());
    }
}
