//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,

    // Profile
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A user together with its authority set, as read from the store
///
/// This is what the authentication core consumes: identity, secret hash and
/// role tags. The secret is only ever present in hashed form.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user: User,
    pub authorities: Vec<String>,
}

/// Fields needed to persist a new account
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
    pub authorities: Vec<String>,
}

/// Register request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username can't be empty"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "password can't be empty"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Optional explicit authority set; defaults to ROLE_USER when absent
    pub authorities: Option<Vec<String>>,
}

/// Profile update request (name only, no auth-state impact)
#[derive(Debug, Deserialize, validator::Validate)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Username change request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct ChangeUsernameRequest {
    #[validate(length(min = 1, max = 50, message = "username can't be empty"))]
    pub username: String,
}

/// Password change request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128, message = "password can't be empty"))]
    pub password: String,
}

/// Profile picture change request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct ChangeProfilePictureRequest {
    #[validate(length(min = 1, message = "profile picture URL can't be empty"))]
    pub profile_picture: String,
}

/// User response (without sensitive data)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_picture: user.profile_picture,
        }
    }
}

/// User response plus an optionally re-minted session token
///
/// Returned by the username change flow: old tokens stay cryptographically
/// valid until expiry, so when the name actually changes the caller gets a
/// fresh token bound to the new identity for its own use. The token travels
/// in the session cookie, never in the response body.
#[derive(Debug)]
pub struct UserWithToken {
    pub user: UserResponse,
    pub token: Option<String>,
}
