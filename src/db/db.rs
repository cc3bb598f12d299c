// db/db.rs
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db::backend::{StorageBackend, StoreError};
use crate::db::categorydb::CategoryExt;
use crate::db::userdb::UserExt;
use crate::error::AppError;
use crate::models::projectmodel::Category;
use crate::models::usermodel::{AdminProfile, UserAccount};
use crate::utils::password;

#[derive(Clone)]
pub struct StoreClient {
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("backend", &self.backend)
            .finish()
    }
}

impl StoreClient {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        StoreClient { backend }
    }

    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.read(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(key, &raw)
    }

    pub(crate) fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// Seed the store on first run: one admin account and the fixed category
    /// catalogue. A store that already holds users is left untouched.
    pub fn initialize(&self, config: &Config) -> Result<(), AppError> {
        if !self.get_users()?.is_empty() {
            return Ok(());
        }

        let password_hash = password::hash(config.admin_password.as_str())
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let admin = UserAccount::Admin(AdminProfile {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: config.admin_email.clone(),
            password_hash,
            profile_image: None,
            created_at: Utc::now(),
        });
        self.save_user(admin)?;

        let categories = default_categories();
        self.save_categories(&categories)?;

        tracing::info!(categories = categories.len(), "seeded default data");

        Ok(())
    }
}

fn default_categories() -> Vec<Category> {
    [
        ("Programming", "code"),
        ("Design", "image"),
        ("Writing", "file-text"),
        ("Translation", "globe"),
        ("Marketing", "trending-up"),
        ("Video", "video"),
        ("Music", "music"),
        ("Business", "briefcase"),
    ]
    .into_iter()
    .map(|(name, icon)| Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}
