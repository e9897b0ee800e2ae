//! Configuration for ShardKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ShardError};

/// Maximum key length, in characters
pub const MAX_KEY_LEN: usize = 1024;

/// Maximum encoded value length, in characters
pub const MAX_VALUE_LEN: usize = 2048;

/// Main configuration for a ShardKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one file per partition
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── 0
    ///     ├── 1
    ///     └── ...
    pub data_dir: PathBuf,

    /// Number of partitions. Fixed at creation; ignored by restore,
    /// which infers it from the directory.
    pub partition_count: usize,

    /// How a partition file is rewritten on every put
    pub write_strategy: WriteStrategy,

    /// fsync the partition file before publishing the new snapshot
    pub sync_on_write: bool,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    pub max_key_len: usize,

    /// Limit on the *encoded* value
    pub max_value_len: usize,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Bounded wait for a partition lock. `None` blocks until acquired.
    pub lock_timeout: Option<Duration>,
}

/// Partition file rewrite strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Truncate and rewrite the partition file in place.
    /// A crash mid-write can leave the file corrupt.
    Overwrite,

    /// Write `<index>.tmp`, sync, then rename over `<index>`
    AtomicRename,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./shardkv_data"),
            partition_count: 16,
            write_strategy: WriteStrategy::Overwrite,
            sync_on_write: true,
            max_key_len: MAX_KEY_LEN,
            max_value_len: MAX_VALUE_LEN,
            lock_timeout: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations no store can run with
    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(ShardError::Config(
                "partition_count must be at least 1".to_string(),
            ));
        }
        if self.max_key_len == 0 || self.max_value_len == 0 {
            return Err(ShardError::Config(
                "key and value limits must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the number of partitions used on create
    pub fn partition_count(mut self, count: usize) -> Self {
        self.config.partition_count = count;
        self
    }

    /// Set the partition file write strategy
    pub fn write_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.config.write_strategy = strategy;
        self
    }

    /// Enable or disable fsync after each partition rewrite
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Set the maximum key length
    pub fn max_key_len(mut self, len: usize) -> Self {
        self.config.max_key_len = len;
        self
    }

    /// Set the maximum encoded value length
    pub fn max_value_len(mut self, len: usize) -> Self {
        self.config.max_value_len = len;
        self
    }

    /// Bound how long a put waits for its partition lock
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
