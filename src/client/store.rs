//! File-backed key/value store for the client cache.
//!
//! Each key is one JSON array in `<dir>/<key>.json`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::error;

/// Roster players.
pub const PLAYERS_KEY: &str = "basketballPlayers";
/// Practice/game session logs.
pub const SESSIONS_KEY: &str = "basketballWorkouts";
/// Shooting stat entries.
pub const STATS_KEY: &str = "basketballStats";
/// Lifting workouts mirrored from the API or saved while offline.
pub const LIFTS_KEY: &str = "basketballLifts";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the array stored under `key`.
    ///
    /// A missing or unreadable entry loads as empty.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match fs::read(self.path(key)).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(items) => items,
                Err(err) => {
                    error!(key, "failed to parse stored data: {err}");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                error!(key, "failed to read stored data: {err}");
                Vec::new()
            }
        }
    }

    /// Replace the array stored under `key`.
    pub async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(items).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, payload).await.map_err(io_err)?;
        fs::rename(&tmp, self.path(key)).await.map_err(io_err)?;
        Ok(())
    }
}
