//! Store Module
//!
//! Routes every key to the partition that owns it.
//!
//! ## Routing
//! `partition = crc32(key as UTF-8) % partition_count`
//!
//! CRC-32 (IEEE) is part of the on-disk contract: a restored store must
//! send a key back to the file it was written to, so this function can
//! never change for an existing directory.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::partition::Partition;

/// A persistent, partitioned key-value store
///
/// ## Concurrency Model
/// - Share one `Store` between threads via `Arc`
/// - Writers to different partitions run fully in parallel
/// - Writers to the same partition are serialized in arrival order
/// - Readers never block
pub struct Store<V> {
    config: Config,

    /// Ordered, fixed-size; index == file name
    partitions: Vec<Partition<V>>,
}

impl<V> Store<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub(crate) fn from_parts(config: Config, partitions: Vec<Partition<V>>) -> Self {
        debug_assert_eq!(config.partition_count, partitions.len());
        Self { config, partitions }
    }

    /// Get the value for `key`
    ///
    /// Fails with `KeyNotFound` if no put for `key` has been published.
    pub fn get(&self, key: &str) -> Result<V> {
        self.partition(key).get(key)
    }

    /// Durably bind `key` to `value`
    ///
    /// When this returns `Ok`, the value is on disk and visible to every
    /// subsequent `get` on any thread.
    pub fn put(&self, key: &str, value: V) -> Result<()> {
        self.partition(key).put(key, value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.partition(key).contains_key(key)
    }

    /// Total number of keys across all partitions
    ///
    /// Each partition is read at its own instant; not an atomic count.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Partition::is_empty)
    }

    fn partition(&self, key: &str) -> &Partition<V> {
        &self.partitions[self.partition_for(key)]
    }
}

impl<V> Store<V> {
    /// Index of the partition owning `key`
    pub fn partition_for(&self, key: &str) -> usize {
        partition_index(key, self.partitions.len())
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[Partition<V>] {
        &self.partitions
    }

    pub fn dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<V> std::fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("dir", &self.config.data_dir)
            .field("partitions", &self.partitions.len())
            .finish()
    }
}

/// Stable key -> partition mapping
pub fn partition_index(key: &str, partition_count: usize) -> usize {
    crc32fast::hash(key.as_bytes()) as usize % partition_count
}
