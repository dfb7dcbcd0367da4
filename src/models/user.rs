use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_alphanumeric;

/// A user document as stored. The password is only ever persisted as a
/// one-way bcrypt digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    /// Ordered, duplicate-permitting sequence of movie references. Any
    /// string is accepted as a movie id; no referential integrity.
    #[serde(default)]
    pub favorite_movies: Vec<String>,
}

/// User information returned in API responses. The password digest never
/// leaves the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            birthday: user.birthday,
            favorite_movies: user.favorite_movies,
        }
    }
}

/// Body for registration (POST /users) and profile update
/// (PUT /users/:username). Both apply the same field rules.
#[derive(Debug, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(
        length(min = 5, message = "username must be at least 5 characters"),
        custom = "validate_alphanumeric"
    )]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(email(message = "email does not appear to be valid"))]
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account fields as handed to the store, password already digested. Used
/// for both insertion and profile replacement.
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: None,
            username: "alice1".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            email: "a@b.com".into(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 1),
            favorite_movies: vec!["m1".into(), "m1".into()],
        }
    }

    #[test]
    fn response_omits_password_hash() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["username"], "alice1");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn response_keeps_duplicate_favorites() {
        let response = UserResponse::from(sample_user());
        assert_eq!(response.favorite_movies, vec!["m1", "m1"]);
    }

    #[test]
    fn stored_user_serializes_birthday_as_date_string() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(json["birthday"], "1990-05-01");
    }
}
