use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};
use twig_diff::{resolve_file_content, show_commit, CommitShow};
use twig_index::{StagingArea, StagingEntry};
use twig_ledger::{CommitChain, CommitRecord, CommitSummary};
use twig_refs::FsRefStore;
use twig_store::{FsObjectStore, ObjectStore};
use twig_types::ObjectId;

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};

/// Name of the metadata directory at the repository root.
pub const TWIG_DIR: &str = ".Twig";

const OBJECTS_DIR: &str = "objects";
const HEAD_FILE: &str = "HEAD";
const INDEX_FILE: &str = "index";
const CONFIG_FILE: &str = "config.toml";

/// A Twig repository rooted at a working directory.
///
/// Mutating calls (`add`, `add_many`, `commit`) are serialized through one
/// lock, so a handle shared between threads never loses a staging update or
/// interleaves HEAD moves. Separate processes are not coordinated.
pub struct Repository {
    root: PathBuf,
    config: RepoConfig,
    store: Arc<FsObjectStore>,
    staging: StagingArea,
    chain: CommitChain,
    write_lock: Mutex<()>,
}

impl Repository {
    /// Create `.Twig/` under `root` and open it.
    ///
    /// Fails with [`SdkError::AlreadyInitialized`] if a HEAD file is already
    /// present; nothing existing is modified in that case.
    pub fn init(root: impl AsRef<Path>) -> SdkResult<Self> {
        let root = root.as_ref();
        let twig_dir = root.join(TWIG_DIR);
        if twig_dir.join(HEAD_FILE).exists() {
            return Err(SdkError::AlreadyInitialized(twig_dir));
        }

        let objects = twig_dir.join(OBJECTS_DIR);
        fs::create_dir_all(&objects).map_err(|e| SdkError::io(&objects, e))?;
        FsRefStore::new(twig_dir.join(HEAD_FILE)).initialize()?;
        StagingArea::new(twig_dir.join(INDEX_FILE), Default::default()).initialize()?;

        info!(path = %twig_dir.display(), "initialized repository");
        Self::open(root)
    }

    /// Open an existing repository, reading `.Twig/config.toml` if present.
    pub fn open(root: impl AsRef<Path>) -> SdkResult<Self> {
        let root = root.as_ref();
        let config = RepoConfig::load(&root.join(TWIG_DIR).join(CONFIG_FILE))?;
        Self::open_with_config(root, config)
    }

    /// Open an existing repository with an explicit configuration.
    pub fn open_with_config(root: impl AsRef<Path>, config: RepoConfig) -> SdkResult<Self> {
        let root = root.as_ref().to_path_buf();
        let twig_dir = root.join(TWIG_DIR);
        if !twig_dir.join(HEAD_FILE).is_file() {
            return Err(SdkError::NotInitialized(root));
        }

        let fsync = config.storage.fsync;
        let store = Arc::new(FsObjectStore::new(
            twig_dir.join(OBJECTS_DIR),
            config.store_options(),
        ));
        let refs = Arc::new(FsRefStore::new(twig_dir.join(HEAD_FILE)).with_fsync(fsync));
        let staging =
            StagingArea::new(twig_dir.join(INDEX_FILE), config.staging.mode).with_fsync(fsync);
        let chain = CommitChain::new(store.clone(), refs);

        debug!(root = %root.display(), mode = ?config.staging.mode, "opened repository");
        Ok(Self {
            root,
            config,
            store,
            staging,
            chain,
            write_lock: Mutex::new(()),
        })
    }

    // ---- Staging ----

    /// Store the file at `path` and stage it.
    ///
    /// Relative paths are resolved against the repository root; the entry is
    /// recorded under `path` exactly as given.
    pub fn add(&self, path: impl AsRef<Path>) -> SdkResult<ObjectId> {
        let _guard = self.lock();
        self.add_locked(path.as_ref())
    }

    /// Stage several files under one lock, in the order given.
    ///
    /// Every file is read before anything is staged, so a bad path leaves
    /// the staging area untouched.
    pub fn add_many<P: AsRef<Path>>(&self, paths: &[P]) -> SdkResult<Vec<StagingEntry>> {
        let _guard = self.lock();
        let files = paths
            .iter()
            .map(|p| self.read_working_file(p.as_ref()))
            .collect::<SdkResult<Vec<_>>>()?;

        files
            .into_iter()
            .map(|(key, data)| {
                let hash = self.stage_bytes(key, &data)?;
                Ok(StagingEntry::new(key, hash))
            })
            .collect()
    }

    /// Whether `path` already has a staged entry.
    pub fn is_staged(&self, path: &str) -> SdkResult<bool> {
        Ok(self.staging.contains(path)?)
    }

    fn add_locked(&self, path: &Path) -> SdkResult<ObjectId> {
        let (key, data) = self.read_working_file(path)?;
        self.stage_bytes(key, &data)
    }

    fn read_working_file<'p>(&self, path: &'p Path) -> SdkResult<(&'p str, Vec<u8>)> {
        let key = path_key(path)?;
        let full = self.root.join(path);
        let data = fs::read(&full).map_err(|e| SdkError::io(&full, e))?;
        Ok((key, data))
    }

    fn stage_bytes(&self, key: &str, data: &[u8]) -> SdkResult<ObjectId> {
        let hash = self.store.write(data)?;
        self.staging.append(key, hash)?;
        Ok(hash)
    }

    /// The staged entries, in staging order.
    pub fn status(&self) -> SdkResult<Vec<StagingEntry>> {
        Ok(self.staging.load()?)
    }

    // ---- Commits ----

    /// Commit the staging area and clear it.
    pub fn commit(&self, message: &str) -> SdkResult<ObjectId> {
        let _guard = self.lock();
        Ok(self.chain.commit(message, &self.staging)?)
    }

    pub fn head(&self) -> SdkResult<Option<ObjectId>> {
        Ok(self.chain.current_head()?)
    }

    pub fn get_commit(&self, id: &ObjectId) -> SdkResult<CommitRecord> {
        Ok(self.chain.get_commit(id)?)
    }

    /// History from HEAD, newest first.
    pub fn log(&self) -> SdkResult<Vec<CommitSummary>> {
        Ok(self.chain.log()?)
    }

    /// History from HEAD, newest first, at most `limit` entries when given.
    pub fn history(&self, limit: Option<usize>) -> SdkResult<Vec<CommitSummary>> {
        Ok(self.chain.history(limit)?)
    }

    /// Every file of commit `id` with its diff against the parent.
    pub fn show(&self, id: &ObjectId) -> SdkResult<CommitShow> {
        Ok(show_commit(&self.chain, self.store.as_ref(), id)?)
    }

    /// The content of `path` as of commit `id`.
    pub fn file_at(&self, id: &ObjectId, path: &str) -> SdkResult<Option<Vec<u8>>> {
        let record = self.chain.get_commit(id)?;
        Ok(resolve_file_content(self.store.as_ref(), &record, path)?)
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn twig_dir(&self) -> PathBuf {
        self.root.join(TWIG_DIR)
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &FsObjectStore {
        &self.store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded state lives on disk; a panicked holder leaves nothing
        // half-updated in memory.
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn path_key(path: &Path) -> SdkResult<&str> {
    match path.to_str() {
        Some("") => Err(SdkError::InvalidPath("empty path".into())),
        Some(key) => Ok(key),
        None => Err(SdkError::InvalidPath(format!(
            "{} is not valid UTF-8",
            path.display()
        ))),
    }
}
