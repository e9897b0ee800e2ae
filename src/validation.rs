//! Size limits checked before any mutation.
//!
//! Lengths are counted in characters. The value limit applies to the
//! JSON-encoded form, so a string value pays two characters for its quotes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, ShardError};

/// Reject keys longer than `max` characters
pub fn validate_key(key: &str, max: usize) -> Result<()> {
    let len = key.chars().count();
    if len > max {
        return Err(ShardError::KeyTooLong { len, max });
    }
    Ok(())
}

/// Reject encoded values longer than `max` characters
pub fn validate_value(encoded: &str, max: usize) -> Result<()> {
    let len = encoded.chars().count();
    if len > max {
        return Err(ShardError::ValueTooLong { len, max });
    }
    Ok(())
}

/// Serialize a value the same way it is written to the partition file.
///
/// The encoding must decode back into `V`: serde_json writes non-finite
/// floats as `null`, which would make the partition file unreadable.
pub fn encode_value<V: Serialize + DeserializeOwned>(value: &V) -> Result<String> {
    let encoded = serde_json::to_string(value)?;

    if let Err(e) = serde_json::from_str::<V>(&encoded) {
        return Err(ShardError::Serialization(format!(
            "value does not round-trip as {encoded}: {e}"
        )));
    }

    Ok(encoded)
}
