use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Freelancer,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Client => "client",
            UserRole::Freelancer => "freelancer",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub project_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    pub portfolio: Vec<PortfolioItem>,
    pub ratings: Vec<Rating>,
    pub average_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FreelancerProfile {
    /// Arithmetic mean over all ratings, recomputed from scratch so the
    /// stored value never drifts from the rating list.
    pub fn recompute_average_rating(&mut self) {
        if self.ratings.is_empty() {
            self.average_rating = 0.0;
        } else {
            let total: i64 = self.ratings.iter().map(|r| r.rating as i64).sum();
            self.average_rating = total as f64 / self.ratings.len() as f64;
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Role-tagged account union. The serialized `role` field discriminates the
/// variant, so the persisted `users` array mixes all three profile shapes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserAccount {
    Client(ClientProfile),
    Freelancer(FreelancerProfile),
    Admin(AdminProfile),
}

impl UserAccount {
    pub fn id(&self) -> Uuid {
        match self {
            UserAccount::Client(c) => c.id,
            UserAccount::Freelancer(f) => f.id,
            UserAccount::Admin(a) => a.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            UserAccount::Client(c) => &c.username,
            UserAccount::Freelancer(f) => &f.username,
            UserAccount::Admin(a) => &a.username,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            UserAccount::Client(c) => &c.email,
            UserAccount::Freelancer(f) => &f.email,
            UserAccount::Admin(a) => &a.email,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            UserAccount::Client(c) => &c.password_hash,
            UserAccount::Freelancer(f) => &f.password_hash,
            UserAccount::Admin(a) => &a.password_hash,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            UserAccount::Client(c) => c.created_at,
            UserAccount::Freelancer(f) => f.created_at,
            UserAccount::Admin(a) => a.created_at,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            UserAccount::Client(_) => UserRole::Client,
            UserAccount::Freelancer(_) => UserRole::Freelancer,
            UserAccount::Admin(_) => UserRole::Admin,
        }
    }

    pub fn as_freelancer(&self) -> Option<&FreelancerProfile> {
        match self {
            UserAccount::Freelancer(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_freelancer_mut(&mut self) -> Option<&mut FreelancerProfile> {
        match self {
            UserAccount::Freelancer(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freelancer_with_ratings(values: &[i32]) -> FreelancerProfile {
        FreelancerProfile {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: "hash".to_string(),
            profile_image: None,
            description: String::new(),
            skills: vec![],
            portfolio: vec![],
            ratings: values
                .iter()
                .map(|v| Rating {
                    id: Uuid::new_v4(),
                    client_id: Uuid::new_v4(),
                    client_name: "ana".to_string(),
                    project_id: Uuid::new_v4(),
                    rating: *v,
                    comment: String::new(),
                    created_at: Utc::now(),
                })
                .collect(),
            average_rating: 0.0,
            whatsapp_number: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn average_rating_is_exact_mean() {
        let mut freelancer = freelancer_with_ratings(&[5, 4, 3]);
        freelancer.recompute_average_rating();
        assert_eq!(freelancer.average_rating, 4.0);
    }

    #[test]
    fn average_rating_of_no_ratings_is_zero() {
        let mut freelancer = freelancer_with_ratings(&[]);
        freelancer.average_rating = 2.5;
        freelancer.recompute_average_rating();
        assert_eq!(freelancer.average_rating, 0.0);
    }

    #[test]
    fn account_role_tag_discriminates_variants() {
        let account = UserAccount::Freelancer(freelancer_with_ratings(&[]));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["role"], "freelancer");

        let back: UserAccount = serde_json::from_value(json).unwrap();
        assert_eq!(back.role(), UserRole::Freelancer);
    }
}
