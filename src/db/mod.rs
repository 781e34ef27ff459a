//! Storage backends for prediction records.
//!
//! Two interchangeable backends behind one enum, selected exactly once at
//! process start by the MongoDB connectivity probe. There is no runtime
//! switch-over: a database outage after startup surfaces as append errors,
//! not a fallback.

use thiserror::Error;

use crate::models::prediction::PredictionRecord;

pub mod local;
pub mod mongo;

pub use local::FileStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The active storage implementation, fixed for the process lifetime.
pub enum StorageBackend {
    Mongo(MongoStore),
    LocalFile(FileStore),
}

impl StorageBackend {
    /// Durably append one prediction record.
    pub async fn append(&self, record: &PredictionRecord) -> Result<(), StorageError> {
        match self {
            StorageBackend::Mongo(store) => store.append(record).await,
            StorageBackend::LocalFile(store) => store.append(record).await,
        }
    }

    /// Return every stored record, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<PredictionRecord>, StorageError> {
        match self {
            StorageBackend::Mongo(store) => store.list_all().await,
            StorageBackend::LocalFile(store) => store.list_all().await,
        }
    }

    /// Label reported by the health endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Mongo(_) => "MongoDB",
            StorageBackend::LocalFile(_) => "Local JSON",
        }
    }
}
