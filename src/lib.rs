//! # ShardKV
//!
//! A persistent, concurrent key-value store with:
//! - String keys and any serde-serializable value type
//! - A fixed number of partitions, each with its own JSON file
//! - Fair (FIFO) per-partition writers
//! - Lock-free reads of the last durably persisted snapshot
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Callers (many threads)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Store (router)                            │
//! │            crc32(key) % partition_count                     │
//! └──────┬──────────────┬──────────────────────┬────────────────┘
//!        │              │                      │
//!        ▼              ▼                      ▼
//!  ┌───────────┐  ┌───────────┐          ┌───────────┐
//!  │Partition 0│  │Partition 1│   ...    │Partition N│
//!  │ FairLock  │  │ FairLock  │          │ FairLock  │
//!  │ Snapshot  │  │ Snapshot  │          │ Snapshot  │
//!  └─────┬─────┘  └─────┬─────┘          └─────┬─────┘
//!        ▼              ▼                      ▼
//!    {dir}/0        {dir}/1                {dir}/N
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use shardkv::Store;
//!
//! let store: Store<String> = Store::create("./data", 4)?;
//! store.put("greeting", "hello".to_string())?;
//! assert_eq!(store.get("greeting")?, "hello");
//!
//! drop(store);
//! let store: Store<String> = Store::restore("./data")?;
//! assert_eq!(store.get("greeting")?, "hello");
//! # Ok::<(), shardkv::ShardError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod validation;
pub mod storage;
pub mod partition;
pub mod store;
mod bootstrap;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ShardError, Result};
pub use config::{Config, WriteStrategy};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShardKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
