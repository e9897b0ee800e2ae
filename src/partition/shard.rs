//! Partition implementation
//!
//! One in-memory snapshot + one backing file + one fair lock.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, ShardError};
use crate::storage::PartitionFile;
use crate::validation::{encode_value, validate_key, validate_value};

use super::{FairLock, FairLockGuard, Mapping, SnapshotCell};

/// An independently locked shard of the key space
///
/// ## Concurrency:
/// - `put`: serialized per partition by `lock`, granted in FIFO order
/// - `get`: lock-free, reads the last published snapshot
/// - The snapshot is published only after the file rewrite succeeded
pub struct Partition<V> {
    /// Zero-based position in the store
    index: usize,

    /// Backing file `{data_dir}/{index}`
    file: PartitionFile,

    /// Serializes writers
    lock: FairLock,

    /// Current immutable mapping
    snapshot: SnapshotCell<Mapping<V>>,

    max_key_len: usize,
    max_value_len: usize,
    lock_timeout: Option<Duration>,
}

impl<V> Partition<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Open partition `index`, initializing an empty file if none exists
    pub fn create(dir: &Path, index: usize, config: &Config) -> Result<Self> {
        let file = Self::partition_file(dir, index, config);

        let mapping = if file.exists() {
            file.load()?
        } else {
            file.init_empty()?;
            tracing::debug!(partition = index, path = %file.path().display(), "initialized empty partition file");
            BTreeMap::new()
        };

        Ok(Self::with_mapping(index, file, mapping, config))
    }

    /// Open partition `index` from its existing file
    pub fn load(dir: &Path, index: usize, config: &Config) -> Result<Self> {
        let file = Self::partition_file(dir, index, config);
        let mapping = file.load()?;
        Ok(Self::with_mapping(index, file, mapping, config))
    }

    fn partition_file(dir: &Path, index: usize, config: &Config) -> PartitionFile {
        PartitionFile::new(dir, index, config.write_strategy, config.sync_on_write)
    }

    fn with_mapping(index: usize, file: PartitionFile, mapping: Mapping<V>, config: &Config) -> Self {
        tracing::debug!(partition = index, entries = mapping.len(), "partition loaded");

        Self {
            index,
            file,
            lock: FairLock::new(),
            snapshot: SnapshotCell::new(mapping),
            max_key_len: config.max_key_len,
            max_value_len: config.max_value_len,
            lock_timeout: config.lock_timeout,
        }
    }

    /// Get the value bound to `key` (lock-free)
    pub fn get(&self, key: &str) -> Result<V> {
        self.snapshot
            .read(|mapping| mapping.get(key).cloned())
            .ok_or_else(|| ShardError::KeyNotFound(key.to_string()))
    }

    /// Bind `key` to `value` durably
    ///
    /// Steps:
    /// 1. Validate key length and encoded value length
    /// 2. Acquire the fair lock
    /// 3. Copy the current mapping and insert the new binding
    /// 4. Rewrite the whole partition file
    /// 5. Publish the new mapping, then release the lock
    pub fn put(&self, key: &str, value: V) -> Result<()> {
        if let Err(e) = self.validate(key, &value) {
            tracing::warn!(partition = self.index, error = %e, "put rejected");
            return Err(e);
        }

        let _guard = self.acquire()?;

        let mut next = self.snapshot.read(|mapping| mapping.clone());
        next.insert(key.to_string(), value);

        // A failed write leaves the published snapshot untouched
        let written = self.file.store(&next)?;
        self.snapshot.publish(next);

        tracing::debug!(partition = self.index, key, bytes = written, "put persisted");
        Ok(())
    }

    fn validate(&self, key: &str, value: &V) -> Result<()> {
        validate_key(key, self.max_key_len)?;
        let encoded = encode_value(value)?;
        validate_value(&encoded, self.max_value_len)
    }

    fn acquire(&self) -> Result<FairLockGuard<'_>> {
        match self.lock_timeout {
            None => Ok(self.lock.lock()),
            Some(timeout) => self.lock.try_lock_for(timeout).ok_or_else(|| {
                tracing::warn!(partition = self.index, ?timeout, "partition lock wait timed out");
                ShardError::LockTimeout {
                    partition: self.index,
                    waited_ms: timeout.as_millis() as u64,
                }
            }),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.snapshot.read(|mapping| mapping.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.snapshot.read(|mapping| mapping.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writers currently blocked on this partition
    pub fn waiting_writers(&self) -> usize {
        self.lock.queue_len()
    }
}

impl<V> std::fmt::Debug for Partition<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("index", &self.index)
            .field("path", &self.file.path())
            .finish_non_exhaustive()
    }
}
