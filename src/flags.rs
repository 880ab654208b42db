// ABOUTME: Feature flag persistence for the pipeline switch, behind an async store trait
// ABOUTME: JSON file store with temp-file rename writes and an in-memory store with write-failure injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// A named boolean switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFlag {
    /// Flag name
    pub name: String,
    /// Whether the flag is on
    pub enabled: bool,
}

/// Durable storage for named flags
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a flag; `None` when it was never saved
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read
    async fn load(&self, name: &str) -> AppResult<Option<bool>>;

    /// Durably record a flag value before returning
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted
    async fn save(&self, name: &str, enabled: bool) -> AppResult<()>;
}

/// One persisted flag entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredFlag {
    enabled: bool,
    updated_at: DateTime<Utc>,
}

/// Flags kept in a single JSON document on disk
///
/// Writes go to a sibling temp file that is renamed over the document, so
/// readers never see a partially written file.
pub struct FileFlagStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileFlagStore {
    /// Store flags in the document at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Document location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> AppResult<BTreeMap<String, StoredFlag>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                AppError::serialization(format!(
                    "flag file {} is not valid JSON: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::storage(format!(
                "failed to read flag file {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl FlagStore for FileFlagStore {
    async fn load(&self, name: &str) -> AppResult<Option<bool>> {
        let document = self.read_document().await?;
        Ok(document.get(name).map(|flag| flag.enabled))
    }

    async fn save(&self, name: &str, enabled: bool) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document.insert(
            name.to_owned(),
            StoredFlag {
                enabled,
                updated_at: Utc::now(),
            },
        );
        let json = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(flag = name, enabled, path = %self.path.display(), "persisted flag");
        Ok(())
    }
}

/// Flags held in memory, for tests and ephemeral runs
#[derive(Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<HashMap<String, bool>>,
    fail_writes: AtomicBool,
}

impl InMemoryFlagStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `save` calls fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn load(&self, name: &str) -> AppResult<Option<bool>> {
        let flags = self
            .flags
            .read()
            .map_err(|e| AppError::internal(format!("flag store lock poisoned: {e}")))?;
        Ok(flags.get(name).copied())
    }

    async fn save(&self, name: &str, enabled: bool) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!(
                "simulated write failure for flag '{name}'"
            )));
        }
        self.flags
            .write()
            .map_err(|e| AppError::internal(format!("flag store lock poisoned: {e}")))?
            .insert(name.to_owned(), enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip_and_failure() {
        let store = InMemoryFlagStore::new();
        assert_eq!(store.load("f").await.unwrap(), None);

        store.save("f", true).await.unwrap();
        assert_eq!(store.load("f").await.unwrap(), Some(true));

        store.set_fail_writes(true);
        assert!(store.save("f", false).await.is_err());
        assert_eq!(store.load("f").await.unwrap(), Some(true));
    }
}
