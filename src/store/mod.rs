// SPDX-License-Identifier: MPL-2.0

//! Persistent string-keyed storage shared by the session and draft layers.

mod db;
pub mod keys;
mod memory;
mod schema;

pub use db::SqliteStore;
pub use memory::MemoryStore;

use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage path error: {0}")]
    Path(String),
}

/// A string-keyed persistent store.
///
/// Callers namespace their keys through [`keys`]; the store itself knows
/// nothing about what it holds.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-wide handle to the store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Read and decode a JSON value. Undecodable data counts as absent.
pub fn get_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed stored value");
            Ok(None)
        }
    }
}

pub fn set_json<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{KeyValueStore, StoreError};

    /// A store whose every operation fails, like a browser with storage disabled.
    pub struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn json_helpers_round_trip() {
        let store = MemoryStore::new();
        set_json(
            &store,
            "sample",
            &Sample {
                name: "ada".into(),
            },
        )
        .unwrap();

        let loaded: Option<Sample> = get_json(&store, "sample").unwrap();
        assert_eq!(loaded.unwrap().name, "ada");
    }

    #[test]
    fn malformed_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("sample", "{not json").unwrap();

        let loaded: Option<Sample> = get_json(&store, "sample").unwrap();
        assert!(loaded.is_none());
    }
}
