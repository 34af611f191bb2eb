//! Per-repository configuration stored at `.Twig/config.toml`.
//!
//! The file is optional; every key has a default.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use twig_index::StagingMode;
use twig_store::FsStoreOptions;

use crate::error::{SdkError, SdkResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    pub staging: StagingConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagingConfig {
    /// Whether re-adding a staged path replaces its entry or appends another.
    pub mode: StagingMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// fsync object, HEAD, and index writes before renaming them into place.
    pub fsync: bool,
    /// Re-hash objects on read and reject mismatches.
    pub verify_reads: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            fsync: true,
            verify_reads: true,
        }
    }
}

impl RepoConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> SdkResult<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SdkError::io(path, e)),
        }
    }

    pub fn from_toml_str(raw: &str) -> SdkResult<Self> {
        toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub(crate) fn store_options(&self) -> FsStoreOptions {
        FsStoreOptions {
            fsync: self.storage.fsync,
            verify_reads: self.storage.verify_reads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RepoConfig::default();
        assert_eq!(c.staging.mode, StagingMode::ReplacePath);
        assert!(c.storage.fsync);
        assert!(c.storage.verify_reads);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(RepoConfig::from_toml_str("").unwrap(), RepoConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c = RepoConfig::from_toml_str("[staging]\nmode = \"append\"\n").unwrap();
        assert_eq!(c.staging.mode, StagingMode::Append);
        assert_eq!(c.storage, StorageConfig::default());
    }

    #[test]
    fn storage_flags_parse() {
        let c = RepoConfig::from_toml_str("[storage]\nfsync = false\nverify_reads = false\n")
            .unwrap();
        assert!(!c.store_options().fsync);
        assert!(!c.store_options().verify_reads);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RepoConfig::from_toml_str("[storage]\ncompress = true\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
        let err = RepoConfig::from_toml_str("[remote]\nurl = \"x\"\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = RepoConfig::from_toml_str("[staging]\nmode = \"dedupe\"\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = RepoConfig::default();
        c.staging.mode = StagingMode::Append;
        c.storage.fsync = false;
        let raw = c.to_toml_string().unwrap();
        assert_eq!(RepoConfig::from_toml_str(&raw).unwrap(), c);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = RepoConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(c, RepoConfig::default());
    }
}
