//! Key-value stores the server can run on.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage backend selected through `DATA_STORE_KIND`.
pub trait DataStore: fmt::Debug + Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Looks up `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the entry is invalid or the backend
    /// rejects the write.
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Failures raised by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The in-memory store was configured to hold nothing.
    #[error("store capacity must be greater than zero")]
    ZeroCapacity,
    /// The in-memory store holds `capacity` keys already.
    #[error("store is full ({0} keys)")]
    Full(usize),
    /// Keys must be non-empty and free of `=` and line breaks; values must
    /// be free of line breaks.
    #[error("invalid entry {0:?}")]
    InvalidEntry(String),
    /// The backing file could not be read or written.
    #[error("store file {} failed: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

fn check_entry(key: &str, value: &str) -> Result<(), StoreError> {
    let bad_key = key.is_empty() || key.contains(['=', '\n', '\r']);
    if bad_key || value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidEntry(format!("{key}={value}")));
    }
    Ok(())
}

/// Bounded map held in memory.
#[derive(Debug)]
pub struct MemStore {
    capacity: usize,
    entries: BTreeMap<String, String>,
}

impl MemStore {
    /// Creates an empty store holding at most `capacity` keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ZeroCapacity`] when `capacity` is zero.
    pub const fn with_capacity(capacity: usize) -> Result<Self, StoreError> {
        if capacity == 0 {
            return Err(StoreError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            entries: BTreeMap::new(),
        })
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DataStore for MemStore {
    fn name(&self) -> &'static str {
        "mem"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_entry(key, value)?;
        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            return Err(StoreError::Full(self.capacity));
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Append-only `key=value` log; the last line for a key wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Loads the store from `path`, creating an empty file first when
    /// `create` is set and the file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be created or read.
    pub fn open(path: &Path, create: bool) -> Result<Self, StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if create {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io_err)?;
        }
        let contents = fs::read_to_string(path).map_err(io_err)?;
        let entries = contents
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        tracing::debug!(path = %path.display(), "file store opened");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// File backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_entry(key, value)?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{key}={value}").map_err(io_err)?;
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    #[rstest]
    fn mem_store_is_bounded() -> Result<()> {
        let mut store = MemStore::with_capacity(1)?;
        store.put("a", "1")?;
        store.put("a", "2")?;
        ensure!(store.get("a")?.as_deref() == Some("2"));
        let err = store
            .put("b", "3")
            .err()
            .ok_or_else(|| anyhow!("expected full store"))?;
        ensure!(matches!(err, StoreError::Full(1)));
        ensure!(store.len() == 1);
        Ok(())
    }

    #[rstest]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            MemStore::with_capacity(0),
            Err(StoreError::ZeroCapacity)
        ));
    }

    #[rstest]
    #[case::empty_key("", "v")]
    #[case::equals_in_key("a=b", "v")]
    #[case::newline_in_value("a", "v\nb=c")]
    fn invalid_entries_are_rejected(#[case] key: &str, #[case] value: &str) -> Result<()> {
        let mut store = MemStore::with_capacity(4)?;
        ensure!(matches!(
            store.put(key, value),
            Err(StoreError::InvalidEntry(_))
        ));
        ensure!(store.is_empty());
        Ok(())
    }

    #[rstest]
    fn file_store_replays_log() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.db");
        let mut store = FileStore::open(&path, true)?;
        store.put("greeting", "hello")?;
        store.put("greeting", "hi")?;
        store.put("name", "envgen")?;

        let reopened = FileStore::open(&path, false)?;
        ensure!(reopened.get("greeting")?.as_deref() == Some("hi"));
        ensure!(reopened.get("name")?.as_deref() == Some("envgen"));
        ensure!(reopened.path() == path);
        Ok(())
    }

    #[rstest]
    fn missing_file_without_create_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let err = FileStore::open(&dir.path().join("absent.db"), false)
            .err()
            .ok_or_else(|| anyhow!("expected io error"))?;
        ensure!(matches!(err, StoreError::Io { .. }));
        ensure!(err.to_string().contains("absent.db"), "unexpected: {err}");
        Ok(())
    }
}
