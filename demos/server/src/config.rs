//! Server configuration.
//!
//! The structs here are the schema the build script feeds to `envgen`; the
//! generated `from_env` constructors, parsers and [`EnvError`] are included
//! from `$OUT_DIR`. Field docs are carried into the `.env` example.

use std::path::PathBuf;
use std::time::Duration;

use envgen_macros::EnvSchema;

use crate::datastore::{DataStore, FileStore, MemStore, StoreError};

/// Top-level settings for the key-value server.
#[derive(Debug, Clone, PartialEq, Eq, EnvSchema)]
pub struct Config {
    /// Host will configure the http server for what hostname to listen on.
    #[env(default = "localhost")]
    pub host: String,
    /// Port to listen on.
    #[env(default = "3000")]
    pub port: u16,
    /// Logs every request at debug level.
    #[env(default = "false")]
    pub debug: bool,
    /// How long in-flight requests get to finish on shutdown.
    #[env(default = "5s")]
    pub shutdown_timeout: Duration,
    /// Request methods the server accepts.
    #[env(default = "GET,PUT")]
    pub allowed_methods: Vec<String>,
    /// Stop after this many requests; unlimited when unset.
    pub max_requests: Option<u64>,
    /// Where values are kept.
    pub data_store: DataStoreConfig,
}

/// Chooses and configures the backing store.
#[derive(Debug, Clone, PartialEq, Eq, EnvSchema)]
pub struct DataStoreConfig {
    /// Store implementation to use.
    #[env(build = "Box<dyn DataStore>")]
    pub kind: String,
    /// Settings for the in-memory store.
    #[env(key = "MEM")]
    pub mem: Option<MemDataStoreConfig>,
    /// Settings for the file-backed store.
    #[env(key = "FILE")]
    pub file: Option<FileDataStoreConfig>,
}

/// In-memory store settings.
#[derive(Debug, Clone, PartialEq, Eq, EnvSchema)]
pub struct MemDataStoreConfig {
    /// Maximum number of keys held.
    #[env(default = "1024")]
    pub capacity: usize,
}

impl MemDataStoreConfig {
    /// Creates the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ZeroCapacity`] when `capacity` is zero.
    pub fn build(&self) -> Result<Box<dyn DataStore>, StoreError> {
        Ok(Box::new(MemStore::with_capacity(self.capacity)?))
    }
}

/// File-backed store settings.
#[derive(Debug, Clone, PartialEq, Eq, EnvSchema)]
pub struct FileDataStoreConfig {
    /// File that holds one `key=value` pair per line.
    #[env(key = "FILENAME", default = "data.db")]
    pub filename: PathBuf,
    /// Creates the file when it does not exist yet.
    #[env(default = "true")]
    pub create: bool,
}

impl FileDataStoreConfig {
    /// Opens the file-backed store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be opened.
    pub fn build(&self) -> Result<Box<dyn DataStore>, StoreError> {
        Ok(Box::new(FileStore::open(&self.filename, self.create)?))
    }
}

mod generated {
    include!(concat!(env!("OUT_DIR"), "/config_gen.rs"));
}

pub use generated::EnvError;

/// `.env` example listing every key the loader reads.
pub const ENV_EXAMPLE: &str = include_str!(concat!(env!("OUT_DIR"), "/config.env"));

