//! File-backed record store.
//!
//! Each collection is one pretty-printed JSON array at
//! `<data_dir>/<name>.json`. The file on disk is the source of truth:
//! identifiers are recomputed from it on every append rather than cached
//! in process state, so external edits are picked up on the next write.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

/// A record kind persisted as one named collection.
pub trait Collection: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name; also the file stem of the backing JSON file.
    const NAME: &'static str;

    /// Called by the store when the record is appended.
    fn stamp(&mut self, id: u64, created_at: String);
}

/// Storage failure surfaced to callers of `save` and `append`.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
            StoreError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

/// Durable store of named JSON collections.
pub struct JsonStore {
    data_dir: PathBuf,
    /// One lock per collection, held across the load+save inside `append`
    /// so concurrent in-process appends serialize and ids never collide.
    locks: std::sync::Mutex<HashMap<&'static str, Arc<Mutex<()>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    fn collection_lock(&self, name: &'static str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("collection lock map poisoned");
        locks.entry(name).or_default().clone()
    }

    /// Read the raw JSON array for a collection. A missing file is the
    /// first-use case and reads as empty; anything else is an error.
    async fn read_raw(&self, name: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(name);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_raw(&self, name: &str, records: &[Value]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let contents = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(self.path_for(name), contents).await?;
        Ok(())
    }

    /// Load a collection. Read or parse failures degrade to an empty
    /// collection (fail-open) and are logged; individual records that no
    /// longer match the schema are skipped.
    pub async fn load<T: Collection>(&self) -> Vec<T> {
        let raw = match self.read_raw(T::NAME).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(collection = T::NAME, "Failed to read collection, serving empty: {}", err);
                return Vec::new();
            }
        };

        raw.into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(collection = T::NAME, "Skipping malformed record: {}", err);
                    None
                }
            })
            .collect()
    }

    /// Overwrite a collection with the given records.
    pub async fn save<T: Collection>(&self, records: &[T]) -> Result<(), StoreError> {
        let raw = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.write_raw(T::NAME, &raw).await
    }

    /// Append one record: assign the next id and a creation timestamp,
    /// then persist the whole collection. Returns the stamped record.
    pub async fn append<T: Collection>(&self, mut record: T) -> Result<T, StoreError> {
        let lock = self.collection_lock(T::NAME);
        let _guard = lock.lock().await;

        let mut raw = match self.read_raw(T::NAME).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(collection = T::NAME, "Failed to read collection before append, starting empty: {}", err);
                Vec::new()
            }
        };

        record.stamp(next_id(&raw), now_timestamp());
        raw.push(serde_json::to_value(&record)?);
        self.write_raw(T::NAME, &raw).await?;

        Ok(record)
    }

    /// Item count per stored collection, keyed by collection name.
    ///
    /// Non-JSON directory entries are skipped; a collection that fails to
    /// parse counts as 0 rather than aborting enumeration.
    pub async fn stats(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();

        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return counts,
            Err(err) => {
                tracing::error!("Failed to read data directory: {}", err);
                return counts;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    tracing::error!("Failed to enumerate data directory: {}", err);
                    break;
                }
            };

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let count = match self.read_raw(name).await {
                Ok(raw) => raw.len(),
                Err(_) => 0,
            };
            counts.insert(name.to_string(), count);
        }

        counts
    }
}

/// Next identifier for a collection: one past the highest numeric id,
/// starting at 1. Records whose id is absent or non-numeric are ignored
/// so they never break numbering.
fn next_id(existing: &[Value]) -> u64 {
    existing
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_u64))
        .max()
        .map_or(1, |max| max + 1)
}

/// Current time as an ISO-8601 UTC string with millisecond precision.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
