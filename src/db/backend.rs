// db/backend.rs
use std::fmt;

use thiserror::Error;

/// Fixed keys of the persisted collections.
pub const USERS_KEY: &str = "users";
pub const PROJECTS_KEY: &str = "projects";
pub const CATEGORIES_KEY: &str = "categories";
pub const CURRENT_USER_KEY: &str = "current_user";

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Generic I/O error (e.g. creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure for a stored document.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,
}

/// Durable key-value backend holding one JSON document per key.
///
/// Writes are whole-document and synchronous; concurrent writers are not
/// coordinated (last writer wins).
pub trait StorageBackend: fmt::Debug + Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
