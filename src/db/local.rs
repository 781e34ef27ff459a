//! Local JSON file backend, used when MongoDB is unreachable at startup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::StorageError;
use crate::models::prediction::PredictionRecord;

/// On-disk layout: one indented JSON document holding every record, so the
/// file stays readable by hand.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    predictions: Vec<PredictionRecord>,
}

/// Append-only record store over a single JSON file.
///
/// Appends are read-modify-write of the whole document, serialized behind a
/// mutex so concurrent requests in this process cannot lose records. Other
/// processes writing the same file are not supported.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &PredictionRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut storage = self.read_file().await?;
        storage.predictions.push(record.clone());
        let encoded = serde_json::to_vec_pretty(&storage)?;
        fs::write(&self.path, encoded).await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<PredictionRecord>, StorageError> {
        Ok(self.read_file().await?.predictions)
    }

    // An absent file reads as an empty store, not an error.
    async fn read_file(&self) -> Result<StorageFile, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(StorageFile::default()),
            Err(error) => Err(error.into()),
        }
    }
}
