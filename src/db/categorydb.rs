// db/categorydb.rs
use super::backend::{StoreError, CATEGORIES_KEY};
use super::db::StoreClient;
use crate::models::projectmodel::Category;

pub trait CategoryExt {
    fn get_categories(&self) -> Result<Vec<Category>, StoreError>;

    fn save_categories(&self, categories: &[Category]) -> Result<(), StoreError>;
}

impl CategoryExt for StoreClient {
    fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.load(CATEGORIES_KEY)?.unwrap_or_default())
    }

    fn save_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.save(CATEGORIES_KEY, &categories)
    }
}
