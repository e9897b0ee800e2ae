//! Bootstrap Module
//!
//! Builds a `Store` either fresh or from an existing directory.
//!
//! ## Create
//! For each index `0..partition_count`: load file `{index}` if present,
//! otherwise create it holding an empty mapping.
//!
//! ## Restore
//! The partition count is the number of regular files directly under the
//! directory. No metadata is stored; restoring a directory that was
//! created with a different count, or that contains foreign files, is
//! unsupported.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, WriteStrategy};
use crate::error::{Result, ShardError};
use crate::partition::Partition;
use crate::storage::{parse_partition_index, partition_path, TEMP_SUFFIX};
use crate::store::Store;

impl<V> Store<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create (or reopen) a store with `partition_count` partitions
    pub fn create(dir: impl Into<PathBuf>, partition_count: usize) -> Result<Self> {
        let config = Config::builder()
            .data_dir(dir)
            .partition_count(partition_count)
            .build();
        Self::create_with(config)
    }

    /// Create a store from a full config
    pub fn create_with(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let partitions = (0..config.partition_count)
            .map(|index| Partition::create(&config.data_dir, index, &config))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            dir = %config.data_dir.display(),
            partitions = partitions.len(),
            entries = partitions.iter().map(Partition::len).sum::<usize>(),
            "store created"
        );

        Ok(Self::from_parts(config, partitions))
    }

    /// Restore a store, inferring the partition count from the directory
    pub fn restore(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::restore_with(Config::builder().data_dir(dir).build())
    }

    /// Restore with a full config; `config.partition_count` is replaced by
    /// the inferred count.
    pub fn restore_with(mut config: Config) -> Result<Self> {
        if !config.data_dir.is_dir() {
            return Err(ShardError::Config(format!(
                "no store directory at {}",
                config.data_dir.display()
            )));
        }

        let count = count_partition_files(&config.data_dir, config.write_strategy)?;
        if count == 0 {
            return Err(ShardError::Config(format!(
                "no partition files under {}",
                config.data_dir.display()
            )));
        }

        config.partition_count = count;
        config.validate()?;

        let partitions = (0..count)
            .map(|index| Partition::load(&config.data_dir, index, &config))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            dir = %config.data_dir.display(),
            partitions = count,
            entries = partitions.iter().map(Partition::len).sum::<usize>(),
            "store restored"
        );

        Ok(Self::from_parts(config, partitions))
    }

    /// Restore if the directory already holds a store, otherwise create one
    pub fn open(config: Config) -> Result<Self> {
        if partition_path(&config.data_dir, 0).is_file() {
            Self::restore_with(config)
        } else {
            Self::create_with(config)
        }
    }
}

/// Count regular files directly under `dir`.
///
/// `<index>.tmp` scratch files left by an interrupted atomic rewrite are
/// not counted. They are removed only when the store itself writes them,
/// i.e. under `WriteStrategy::AtomicRename`.
fn count_partition_files(dir: &Path, strategy: WriteStrategy) -> Result<usize> {
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        let is_scratch = name
            .strip_suffix(TEMP_SUFFIX)
            .and_then(parse_partition_index)
            .is_some();

        if is_scratch {
            if strategy == WriteStrategy::AtomicRename {
                tracing::warn!(path = %path.display(), "removing leftover temp file");
                fs::remove_file(&path)?;
            } else {
                tracing::warn!(path = %path.display(), "skipping temp file");
            }
            continue;
        }

        // Still counted: the directory is trusted to hold only partitions
        if parse_partition_index(&name).is_none() {
            tracing::warn!(path = %path.display(), "unexpected file in store directory");
        }

        count += 1;
    }

    Ok(count)
}
