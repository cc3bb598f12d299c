use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::usermodel::*;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 1, message = "Username is required"),
        length(min = 3, message = "Username must be at least 3 characters")
    )]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: String,

    pub role: UserRole,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Shared with profile updates; numbers reach the UI as WhatsApp links.
pub fn validate_whatsapp_number(number: &str) -> Result<(), ValidationError> {
    let phone_regex =
        regex::Regex::new(r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{3}[- ]?[0-9]{3}[- ]?[0-9]{4}$")
            .map_err(|_| ValidationError::new("invalid_phone_regex"))?;

    if !phone_regex.is_match(number) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "WhatsApp number must be in a valid format (e.g., +1234567890 or 123-456-7890)",
        ));
        return Err(error);
    }
    Ok(())
}

/// Presentation-safe view of a user record. Password hashes never leave the
/// service layer through this type.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &UserAccount) -> Self {
        let (profile_image, description, skills, average_rating, whatsapp_number) = match user {
            UserAccount::Client(c) => {
                (c.profile_image.clone(), c.description.clone(), None, None, None)
            }
            UserAccount::Freelancer(f) => (
                f.profile_image.clone(),
                Some(f.description.clone()),
                Some(f.skills.clone()),
                Some(f.average_rating),
                f.whatsapp_number.clone(),
            ),
            UserAccount::Admin(a) => (a.profile_image.clone(), None, None, None, None),
        };

        FilterUserDto {
            id: user.id().to_string(),
            username: user.username().to_owned(),
            email: user.email().to_owned(),
            role: user.role().to_str().to_string(),
            profile_image,
            description,
            skills,
            average_rating,
            whatsapp_number,
            created_at: user.created_at(),
        }
    }
}
