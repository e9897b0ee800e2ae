//! Tests for PartitionFile
//!
//! These tests verify:
//! - Empty initialization and loading
//! - Whole-file rewrite on store
//! - Atomic-rename writes leave no scratch file
//! - Decode errors name the partition file
//! - Partition file name parsing

use std::collections::BTreeMap;
use std::fs;

use shardkv::storage::{parse_partition_index, PartitionFile};
use shardkv::{ShardError, WriteStrategy};
use tempfile::TempDir;

#[test]
fn test_init_empty_then_load() {
    let temp = TempDir::new().unwrap();
    let file = PartitionFile::new(temp.path(), 0, WriteStrategy::Overwrite, true);

    assert!(!file.exists());
    file.init_empty().unwrap();
    assert!(file.exists());
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "{}");

    let mapping: BTreeMap<String, String> = file.load().unwrap();
    assert!(mapping.is_empty());
}

#[test]
fn test_store_rewrites_whole_file() {
    let temp = TempDir::new().unwrap();
    let file = PartitionFile::new(temp.path(), 3, WriteStrategy::Overwrite, false);

    let mut mapping = BTreeMap::new();
    mapping.insert("a".to_string(), 1u32);
    mapping.insert("b".to_string(), 2u32);
    file.store(&mapping).unwrap();

    mapping.remove("b");
    let written = file.store(&mapping).unwrap();

    assert_eq!(fs::read_to_string(temp.path().join("3")).unwrap(), r#"{"a":1}"#);
    assert_eq!(written, r#"{"a":1}"#.len());
}

#[test]
fn test_atomic_rename_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let file = PartitionFile::new(temp.path(), 1, WriteStrategy::AtomicRename, true);

    let mut mapping = BTreeMap::new();
    mapping.insert("k".to_string(), "v".to_string());
    file.store(&mapping).unwrap();

    assert!(temp.path().join("1").is_file());
    assert!(!temp.path().join("1.tmp").exists());
    let loaded: BTreeMap<String, String> = file.load().unwrap();
    assert_eq!(loaded, mapping);
}

#[test]
fn test_load_corrupt_file_names_path() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("0"), "{\"k\": ").unwrap();
    let file = PartitionFile::new(temp.path(), 0, WriteStrategy::Overwrite, true);

    match file.load::<String>().unwrap_err() {
        ShardError::Serialization(msg) => assert!(msg.contains("partition file")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_partition_index() {
    assert_eq!(parse_partition_index("0"), Some(0));
    assert_eq!(parse_partition_index("17"), Some(17));
    assert_eq!(parse_partition_index("3.tmp"), None);
    assert_eq!(parse_partition_index("-1"), None);
    assert_eq!(parse_partition_index(""), None);
}
