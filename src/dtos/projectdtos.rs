use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(
        length(min = 1, message = "Title is required"),
        length(min = 5, message = "Title must be at least 5 characters")
    )]
    pub title: String,

    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(custom = "validate_budget")]
    pub budget: f64,

    #[validate(custom = "validate_deadline")]
    pub deadline: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

fn validate_budget(budget: f64) -> Result<(), ValidationError> {
    if budget > 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_budget");
    error.message = Some(Cow::from("Budget must be greater than zero"));
    Err(error)
}

fn validate_deadline(deadline: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *deadline > Utc::now() {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_deadline");
    error.message = Some(Cow::from("Deadline must be in the future"));
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_dto() -> CreateProjectDto {
        CreateProjectDto {
            title: "Logo design".to_string(),
            description: "A fresh logo for a small bakery brand".to_string(),
            category: "Design".to_string(),
            budget: 500.0,
            deadline: Utc::now() + Duration::days(30),
            attachment_url: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_project() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_budget() {
        let mut dto = valid_dto();
        dto.budget = 0.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn rejects_past_deadline() {
        let mut dto = valid_dto();
        dto.deadline = Utc::now() - Duration::days(1);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn rejects_short_description() {
        let mut dto = valid_dto();
        dto.description = "too short".to_string();
        assert!(dto.validate().is_err());
    }
}
