//! Partition file
//!
//! Reads and rewrites the complete key -> value mapping of one partition.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::WriteStrategy;
use crate::error::{Result, ShardError};

/// Suffix of the scratch file used by `WriteStrategy::AtomicRename`
pub const TEMP_SUFFIX: &str = ".tmp";

/// Serialized form of an empty mapping
const EMPTY_MAPPING: &[u8] = b"{}";

/// Backing file of a single partition
#[derive(Debug)]
pub struct PartitionFile {
    /// `{data_dir}/{index}`
    path: PathBuf,
    strategy: WriteStrategy,
    sync: bool,
}

impl PartitionFile {
    pub fn new(dir: &Path, index: usize, strategy: WriteStrategy, sync: bool) -> Self {
        Self {
            path: partition_path(dir, index),
            strategy,
            sync,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the file holding an empty mapping
    pub fn init_empty(&self) -> Result<()> {
        self.write_bytes(EMPTY_MAPPING)
    }

    /// Decode the whole mapping, streaming from the start of the file
    pub fn load<V: DeserializeOwned>(&self) -> Result<BTreeMap<String, V>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).map_err(|e| {
            ShardError::Serialization(format!(
                "failed to decode partition file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Rewrite the file with the complete mapping.
    ///
    /// Returns the number of bytes written. When this returns `Ok`, the new
    /// content is on disk (and synced if `sync_on_write` is set).
    pub fn store<V: Serialize>(&self, mapping: &BTreeMap<String, V>) -> Result<usize> {
        let bytes = serde_json::to_vec(mapping)?;
        self.write_bytes(&bytes)?;
        Ok(bytes.len())
    }

    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        match self.strategy {
            WriteStrategy::Overwrite => self.write_to(&self.path, bytes),
            WriteStrategy::AtomicRename => {
                let tmp = self.temp_path();
                self.write_to(&tmp, bytes)?;
                fs::rename(&tmp, &self.path)?;
                if self.sync {
                    sync_parent_dir(&self.path)?;
                }
                Ok(())
            }
        }
    }

    fn write_to(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        file.write_all(bytes)?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }
}

/// Path of partition `index` under `dir`
pub fn partition_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(index.to_string())
}

/// "12" -> Some(12); anything else -> None
pub fn parse_partition_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
