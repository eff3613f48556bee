//! Event Store - durable whole-file record collection
//!
//! The store keeps every accepted record in one pretty-printed JSON array.
//! Each operation reads (and, for mutations, rewrites) the whole file while
//! holding a single lock, so concurrent callers never observe a half-written
//! collection and never lose each other's appends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::types::{Collection, Record};
use crate::utils::{atomic_write, file_timestamp, move_aside, remove_stale_temp};

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Directory holding the data file
    pub data_dir: PathBuf,
    /// Name of the data file inside `data_dir`
    pub file_name: String,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "mdb_data.json".to_string(),
        }
    }
}

impl EventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Get path to the data file
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Where an unreadable data file is moved before it gets replaced
    pub fn corrupt_backup_path(&self, stamp: &str) -> PathBuf {
        let data_path = self.data_path();
        let stem = data_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string());
        self.data_dir.join(format!("{}.corrupt-{}.json", stem, stamp))
    }
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("cannot create data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("data file {} is not a valid record list: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EventStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        EventStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The EventStore owns the on-disk record collection
pub struct EventStore {
    config: EventStoreConfig,
    data_path: PathBuf,
    /// Serializes every load/modify/persist sequence
    lock: Mutex<()>,
}

impl EventStore {
    /// Open the store, preparing the data directory and file.
    ///
    /// Creates the data directory when missing, removes the data file's own
    /// temp sibling left by an interrupted write, and persists an empty
    /// collection on first start. Other files in the directory are left alone.
    pub fn open(config: EventStoreConfig) -> EventStoreResult<Self> {
        fs::create_dir_all(&config.data_dir).map_err(|source| EventStoreError::DataDir {
            path: config.data_dir.clone(),
            source,
        })?;

        let data_path = config.data_path();

        if remove_stale_temp(&data_path).map_err(|e| EventStoreError::io(&data_path, e))? {
            warn!(path = %data_path.display(), "removed temp file left by an interrupted write");
        }

        if !data_path.exists() {
            atomic_write(&data_path, b"[]").map_err(|e| EventStoreError::io(&data_path, e))?;
            info!(path = %data_path.display(), "created empty data file");
        }

        Ok(Self {
            config,
            data_path,
            lock: Mutex::new(()),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.data_path
    }

    /// Load the whole collection, reporting read and parse failures
    pub fn try_load(&self) -> EventStoreResult<Collection> {
        let _guard = self.lock.lock();
        self.read_collection()
    }

    /// Load the whole collection.
    ///
    /// A missing file is an empty collection. An unreadable or unparseable
    /// file is logged and also yields an empty collection, which callers
    /// must not take as proof that no data exists.
    pub fn load(&self) -> Collection {
        match self.try_load() {
            Ok(records) => {
                debug!(count = records.len(), "loaded collection");
                records
            }
            Err(e) => {
                error!(error = %e, "failed to load collection, serving empty");
                Vec::new()
            }
        }
    }

    /// Append a record and persist the collection, returning the new length
    pub fn append(&self, record: Record) -> EventStoreResult<usize> {
        let _guard = self.lock.lock();

        let mut records = self.load_for_write()?;
        records.push(record);

        if let Err(e) = self.write_collection(&records) {
            error!(error = %e, "append failed, collection unchanged");
            return Err(e);
        }

        let count = records.len();
        info!(count, "record appended");
        Ok(count)
    }

    /// Up to the last `n` records, most recent first
    pub fn latest(&self, n: usize) -> Collection {
        self.load().into_iter().rev().take(n).collect()
    }

    /// Replace the collection with an empty one
    pub fn clear(&self) -> EventStoreResult<()> {
        let _guard = self.lock.lock();

        if let Err(e) = self.write_collection(&[]) {
            error!(error = %e, "clear failed, collection unchanged");
            return Err(e);
        }

        info!("collection cleared");
        Ok(())
    }

    /// The collection as pretty-printed JSON, ready for download
    pub fn export(&self) -> EventStoreResult<Vec<u8>> {
        let records = self.load();
        Ok(serde_json::to_vec_pretty(&records)?)
    }

    /// Number of records currently persisted
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Read and parse the data file (caller holds the lock)
    fn read_collection(&self) -> EventStoreResult<Collection> {
        let bytes = match fs::read(&self.data_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EventStoreError::io(&self.data_path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| EventStoreError::Corrupt {
            path: self.data_path.clone(),
            source,
        })
    }

    /// Load before a mutation (caller holds the lock).
    ///
    /// An unparseable file is moved aside so the rewrite cannot destroy it.
    /// Any other read failure aborts the mutation.
    fn load_for_write(&self) -> EventStoreResult<Collection> {
        match self.read_collection() {
            Err(EventStoreError::Corrupt { path, source }) => {
                let backup = self.config.corrupt_backup_path(&file_timestamp());
                move_aside(&path, &backup).map_err(|e| EventStoreError::io(&path, e))?;
                warn!(
                    error = %source,
                    backup = %backup.display(),
                    "data file unparseable, moved aside and starting a new collection"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Persist the collection atomically (caller holds the lock)
    fn write_collection(&self, records: &[Record]) -> EventStoreResult<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        atomic_write(&self.data_path, &bytes).map_err(|e| EventStoreError::io(&self.data_path, e))
    }
}
