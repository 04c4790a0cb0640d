//! Persistence boundary for scenes.
//!
//! Real backends (local storage, files, remote) live with the host; this
//! crate ships the trait and an in-memory implementation.

mod memory;

pub use memory::MemoryStorage;

use crate::scene::Scene;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Scene not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Scene storage backend.
pub trait Storage: Send + Sync {
    /// Save a scene under `key`, overwriting any previous one.
    fn save(&self, key: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the scene stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Scene>>;

    /// Delete a scene. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a scene exists.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
