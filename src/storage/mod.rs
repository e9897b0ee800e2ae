//! Storage Module
//!
//! On-disk representation of partitions.
//!
//! ## Responsibilities
//! - One file per partition, named by its zero-based index
//! - Whole-mapping rewrite on every write (not an append log)
//! - Streaming decode of a partition file on create/restore
//!
//! ## File Format
//! ```text
//! {data_dir}/
//!   ├── 0      {"apple":1,"kiwi":{"n":2}}
//!   ├── 1      {}
//!   └── ...
//! ```
//! Each file is a single JSON object mapping keys to values. Keys are
//! sorted because the in-memory mapping is a `BTreeMap`.

mod file;

pub use file::{parse_partition_index, partition_path, PartitionFile, TEMP_SUFFIX};
