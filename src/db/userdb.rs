// db/userdb.rs
use uuid::Uuid;

use super::backend::{StoreError, USERS_KEY};
use super::db::StoreClient;
use crate::models::usermodel::UserAccount;

/// Typed access to the persisted `users` collection. Every operation is a
/// full-collection load, linear scan, and (for mutations) full rewrite.
pub trait UserExt {
    fn get_users(&self) -> Result<Vec<UserAccount>, StoreError>;

    fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<UserAccount>, StoreError>;

    fn save_user(&self, user: UserAccount) -> Result<UserAccount, StoreError>;

    /// Wholesale replacement of the record with the same id. Returns `false`
    /// when no such record exists.
    fn update_user(&self, user: UserAccount) -> Result<bool, StoreError>;

    fn remove_user(&self, user_id: Uuid) -> Result<(), StoreError>;
}

impl UserExt for StoreClient {
    fn get_users(&self) -> Result<Vec<UserAccount>, StoreError> {
        Ok(self.load(USERS_KEY)?.unwrap_or_default())
    }

    fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<UserAccount>, StoreError> {
        let users = self.get_users()?;
        Ok(users.into_iter().find(|user| {
            user_id.map_or(false, |id| user.id() == id)
                || email.map_or(false, |e| user.email() == e)
        }))
    }

    fn save_user(&self, user: UserAccount) -> Result<UserAccount, StoreError> {
        let mut users = self.get_users()?;
        users.push(user.clone());
        self.save(USERS_KEY, &users)?;
        Ok(user)
    }

    fn update_user(&self, user: UserAccount) -> Result<bool, StoreError> {
        let mut users = self.get_users()?;
        match users.iter().position(|u| u.id() == user.id()) {
            Some(index) => {
                users[index] = user;
                self.save(USERS_KEY, &users)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.get_users()?;
        users.retain(|u| u.id() != user_id);
        self.save(USERS_KEY, &users)
    }
}
