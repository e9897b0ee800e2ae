//! Partition Module
//!
//! An independently locked shard of the key space.
//!
//! ## Responsibilities
//! - Own one backing file and one immutable mapping snapshot
//! - Serialize writers with a fair (FIFO) lock
//! - Serve reads without taking any lock
//!
//! ## Write Protocol
//! ```text
//! validate ─▶ lock ─▶ copy + insert ─▶ rewrite file ─▶ publish ─▶ unlock
//! ```
//! Persistence happens-before visibility: the snapshot pointer is swapped
//! only after the file rewrite returned successfully.

mod fair_lock;
mod shard;
mod snapshot;

use std::collections::BTreeMap;

pub use fair_lock::{FairLock, FairLockGuard};
pub use shard::Partition;
pub(crate) use snapshot::SnapshotCell;

/// Complete key -> value state of one partition
pub type Mapping<V> = BTreeMap<String, V>;
