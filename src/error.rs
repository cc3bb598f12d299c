use std::fmt;

use thiserror::Error;

use crate::db::StoreError;

/// Canonical user-facing message strings shared across services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    WrongCredentials,
    EmailExist,
    UserNoLongerExist,
    UserNotAuthenticated,
    PermissionDenied,
    EmptyPassword,
    ExceededMaxPasswordLength(usize),
    HashingError,
    InvalidHashFormat,
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::WrongCredentials => write!(f, "Email or password is wrong"),
            ErrorMessage::EmailExist => write!(f, "A user with this email already exists"),
            ErrorMessage::UserNoLongerExist => {
                write!(f, "User belonging to this session no longer exists")
            }
            ErrorMessage::UserNotAuthenticated => {
                write!(f, "Authentication required. Please log in.")
            }
            ErrorMessage::PermissionDenied => {
                write!(f, "You are not allowed to perform this action")
            }
            ErrorMessage::EmptyPassword => write!(f, "Password cannot be empty"),
            ErrorMessage::ExceededMaxPasswordLength(max_length) => {
                write!(f, "Password must not be more than {} characters", max_length)
            }
            ErrorMessage::HashingError => write!(f, "Error while hashing password"),
            ErrorMessage::InvalidHashFormat => write!(f, "Invalid password hash format"),
        }
    }
}

/// Crate-wide error taxonomy. Every operation fails fast with exactly one of
/// these; state is left untouched on any rejected operation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Permission(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        AppError::Auth(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        AppError::Permission(message.into())
    }
}
