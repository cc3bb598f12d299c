// db/sessiondb.rs
use super::backend::{StoreError, CURRENT_USER_KEY};
use super::db::StoreClient;
use crate::models::usermodel::UserAccount;

/// The persisted session record: a single user object under `current_user`,
/// or the key absent when nobody is logged in.
pub trait SessionExt {
    fn get_current_user(&self) -> Result<Option<UserAccount>, StoreError>;

    fn save_current_user(&self, user: Option<&UserAccount>) -> Result<(), StoreError>;
}

impl SessionExt for StoreClient {
    fn get_current_user(&self) -> Result<Option<UserAccount>, StoreError> {
        self.load(CURRENT_USER_KEY)
    }

    fn save_current_user(&self, user: Option<&UserAccount>) -> Result<(), StoreError> {
        match user {
            Some(user) => self.save(CURRENT_USER_KEY, user),
            None => self.clear(CURRENT_USER_KEY),
        }
    }
}
