//! Key-value lookup over directories of salt-cloud style YAML files
//!
//! Each file holds a top-level mapping of `name -> record`. A lookup returns
//! the record from the first file that defines the key.

use crate::error::Result;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lookup of named config records.
pub trait ConfigStore: Send + Sync {
    /// Return the record stored under `key`, if any.
    fn lookup(&self, key: &str) -> Result<Option<Value>>;

    /// Human readable location, used in error messages.
    fn location(&self) -> PathBuf;
}

/// Store backed by a directory such as `/etc/salt/cloud.profiles.d`.
///
/// Files are scanned in lexicographic file-name order so `00-base.conf`
/// shadows `10-site.conf` on every run, independent of the order the
/// filesystem hands entries back. Unreadable files, YAML errors and files
/// whose top level is not a mapping are skipped.
#[derive(Debug, Clone)]
pub struct DirConfigStore {
    dir: PathBuf,
}

impl DirConfigStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Regular files of the directory in scan order
    fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "Config directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

impl ConfigStore for DirConfigStore {
    fn lookup(&self, key: &str) -> Result<Option<Value>> {
        for path in self.files()? {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable config file");
                    continue;
                }
            };

            let document: Value = match serde_yaml::from_str(&content) {
                Ok(document) => document,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping malformed config file");
                    continue;
                }
            };

            let Value::Mapping(mapping) = document else {
                debug!(file = %path.display(), "Config file has no top-level mapping");
                continue;
            };

            if let Some(record) = mapping.get(key) {
                debug!(key, file = %path.display(), "Found config record");
                return Ok(Some(record.clone()));
            }
        }

        Ok(None)
    }

    fn location(&self) -> PathBuf {
        self.dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_lookup_first_file_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join("20-site.conf"),
            "web:\n  provider: later\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("10-base.conf"),
            "web:\n  provider: earlier\n",
        )
        .unwrap();

        let store = DirConfigStore::new(temp_dir.path());
        let record = store.lookup("web").unwrap().unwrap();
        assert_eq!(record["provider"].as_str(), Some("earlier"));
    }

    #[test]
    fn test_lookup_skips_malformed_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("00-broken.conf"), "web: [unclosed\n").unwrap();
        fs::write(temp_dir.path().join("05-list.conf"), "- just\n- a list\n").unwrap();
        fs::write(temp_dir.path().join("10-good.conf"), "web:\n  provider: ok\n").unwrap();

        let store = DirConfigStore::new(temp_dir.path());
        let record = store.lookup("web").unwrap().unwrap();
        assert_eq!(record["provider"].as_str(), Some("ok"));
    }

    #[test]
    fn test_lookup_missing_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("a.conf"), "other:\n  provider: x\n").unwrap();

        let store = DirConfigStore::new(temp_dir.path());
        assert!(store.lookup("web").unwrap().is_none());
    }

    #[test]
    fn test_lookup_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DirConfigStore::new(temp_dir.path().join("nope"));
        assert!(store.lookup("web").unwrap().is_none());
    }
}
