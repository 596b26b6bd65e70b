//! Outbound ports
//!
//! Collaborators the core consumes from its host: durable key-value storage,
//! a clock and an id source.

use chrono::{DateTime, Utc};
use crate::domain::value_objects::EntityId;

/// Durable key-value primitive supplied by the host platform
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace whatever is stored under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of unique form and question ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> EntityId;
}

/// Storage error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
