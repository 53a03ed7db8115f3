use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_password_strength, DeclaredFields};

/// Role every account receives unless told otherwise.
pub const DEFAULT_ROLE: &str = "normal";
/// Role that makes login also hand out an admin token.
pub const ADMIN_ROLE: &str = "admin";

/// Whether a role set grants admin tokens at login.
pub fn has_admin_role(roles: &[String]) -> bool {
    roles.iter().any(|role| role == ADMIN_ROLE)
}

/// A user account as held by the store.
///
/// `collection_ids` lists, in creation order, the collections this user added.
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Vec<String>,
    pub collection_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh account from validated signup input and an already hashed password.
    pub fn new(input: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash,
            roles: input
                .auth
                .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]),
            collection_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Signup payload for `POST /api/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255, message = "\"name\" length must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(
        email(message = "\"email\" must be a valid email"),
        length(max = 255, message = "\"email\" length must be less than or equal to 255 characters")
    )]
    pub email: String,
    #[validate(
        length(min = 8, max = 255, message = "\"password\" length must be between 8 and 255 characters"),
        custom = "validate_password_strength"
    )]
    pub password: String,
    /// Requested roles. Anything beyond `normal` needs an admin token.
    #[validate(length(min = 1, max = 255, message = "\"auth\" must contain between 1 and 255 roles"))]
    pub auth: Option<Vec<String>>,
}

impl DeclaredFields for NewUser {
    const FIELDS: &'static [&'static str] = &["name", "email", "password", "auth"];
}

impl NewUser {
    pub fn requests_elevated_roles(&self) -> bool {
        self.auth
            .as_ref()
            .map(|roles| roles.iter().any(|role| role != DEFAULT_ROLE))
            .unwrap_or(false)
    }
}

/// Partial profile update for `PATCH /api/users/me`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 255, message = "\"name\" length must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "\"email\" must be a valid email"),
        length(max = 255, message = "\"email\" length must be less than or equal to 255 characters")
    )]
    pub email: Option<String>,
    #[validate(
        length(min = 8, max = 255, message = "\"password\" length must be between 8 and 255 characters"),
        custom = "validate_password_strength"
    )]
    pub password: Option<String>,
}

impl DeclaredFields for UserUpdate {
    const FIELDS: &'static [&'static str] = &["name", "email", "password"];
}

/// Store-level changes derived from a `UserUpdate`; `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
