// service/session.rs
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{SessionExt, StoreClient, UserExt};
use crate::dtos::{LoginUserDto, RegisterUserDto};
use crate::error::{AppError, ErrorMessage};
use crate::models::usermodel::*;
use crate::utils::password;

/// Tracks the one authenticated user of this process and mirrors it into the
/// store under `current_user`, so a new manager over the same store resumes
/// the session.
#[derive(Debug)]
pub struct SessionManager {
    db_client: StoreClient,
    current: Option<UserAccount>,
}

impl SessionManager {
    pub fn new(db_client: StoreClient) -> Result<Self, AppError> {
        let current = db_client.get_current_user()?;
        Ok(SessionManager { db_client, current })
    }

    pub fn register(&mut self, body: RegisterUserDto) -> Result<UserAccount, AppError> {
        body.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if body.role == UserRole::Admin {
            return Err(AppError::validation("Admin accounts cannot be registered"));
        }

        let existing_user = self.db_client.get_user(None, Some(&body.email))?;
        if existing_user.is_some() {
            return Err(AppError::conflict(ErrorMessage::EmailExist.to_string()));
        }

        let hashed_password = password::hash(body.password.as_str())
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = match body.role {
            UserRole::Freelancer => UserAccount::Freelancer(FreelancerProfile {
                id: Uuid::new_v4(),
                username: body.username,
                email: body.email,
                password_hash: hashed_password,
                profile_image: None,
                description: String::new(),
                skills: vec![],
                portfolio: vec![],
                ratings: vec![],
                average_rating: 0.0,
                whatsapp_number: None,
                created_at: Utc::now(),
            }),
            _ => UserAccount::Client(ClientProfile {
                id: Uuid::new_v4(),
                username: body.username,
                email: body.email,
                password_hash: hashed_password,
                profile_image: None,
                description: None,
                created_at: Utc::now(),
            }),
        };

        let user = self.db_client.save_user(user)?;
        self.db_client.save_current_user(Some(&user))?;

        tracing::info!(
            username = %user.username(),
            role = user.role().to_str(),
            "registered new user"
        );

        self.current = Some(user.clone());
        Ok(user)
    }

    pub fn login(&mut self, body: LoginUserDto) -> Result<UserAccount, AppError> {
        body.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = self.db_client.get_user(None, Some(&body.email))?;
        let user = result.ok_or_else(|| AppError::not_found("User not found"))?;

        let password_matched = password::compare(&body.password, user.password_hash())
            .map_err(|_| AppError::auth(ErrorMessage::WrongCredentials.to_string()))?;

        if !password_matched {
            return Err(AppError::auth(ErrorMessage::WrongCredentials.to_string()));
        }

        self.db_client.save_current_user(Some(&user))?;

        tracing::info!(username = %user.username(), "user logged in");

        self.current = Some(user.clone());
        Ok(user)
    }

    /// Clears the session unconditionally. A failing store write is logged
    /// and swallowed; the in-memory session is gone either way.
    pub fn logout(&mut self) {
        if let Err(err) = self.db_client.save_current_user(None) {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
        self.current = None;
    }

    pub fn current_user(&self) -> Option<&UserAccount> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_client(&self) -> bool {
        self.current
            .as_ref()
            .map_or(false, |u| u.role() == UserRole::Client)
    }

    pub fn is_freelancer(&self) -> bool {
        self.current
            .as_ref()
            .map_or(false, |u| u.role() == UserRole::Freelancer)
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .as_ref()
            .map_or(false, |u| u.role() == UserRole::Admin)
    }
}
