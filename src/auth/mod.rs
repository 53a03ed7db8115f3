pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{has_admin_role, User};
use crate::state::AppState;
use crate::store::DocumentStore;

// Re-export necessary items
pub use middleware::{authenticate, AuthMiddleware, AuthTier, Identity};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKind, TokenService};

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/token/refresh`; the refresh token itself travels as the bearer.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub password: String,
}

/// Tokens handed out on a successful login. `admin_token` is only present
/// for accounts holding the admin role.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub login: bool,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub ok: bool,
    pub access_token: String,
}

/// What the login flow needs to know about an account.
#[derive(Debug, Clone)]
pub struct LoginInfo {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl From<User> for LoginInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
        }
    }
}

impl LoginInfo {
    pub fn is_admin(&self) -> bool {
        has_admin_role(&self.roles)
    }

    /// Drops the password hash, leaving the payload that gets signed.
    pub fn into_claims(self) -> Claims {
        Claims::new(self.id, self.email, self.roles)
    }
}

/// Looks up the login information for `email`.
///
/// Store failures are logged and reported as "no such user" so that callers
/// cannot tell the two apart.
pub async fn login_info(store: &dyn DocumentStore, email: &str) -> Option<LoginInfo> {
    match store.find_user_by_email(email).await {
        Ok(user) => user.map(LoginInfo::from),
        Err(e) => {
            log::warn!("login lookup failed: {}", e);
            None
        }
    }
}

/// Loads the account for `email` and checks `password` against its hash.
/// Every failure collapses into the same `Unauthorized`.
async fn check_credentials(
    store: &dyn DocumentStore,
    email: &str,
    password: &str,
) -> Result<LoginInfo, AppError> {
    let info = login_info(store, email)
        .await
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    match verify_password(password, &info.password_hash) {
        Ok(true) => Ok(info),
        Ok(false) => Err(AppError::Unauthorized("Invalid credentials".into())),
        Err(e) => {
            log::warn!("stored password hash for {} is unusable: {}", info.id, e);
            Err(AppError::Unauthorized("Invalid credentials".into()))
        }
    }
}

/// Issues access and refresh tokens, plus an admin token for admins.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<LoginResponse, AppError> {
    let info = check_credentials(state.store(), email, password).await?;
    let is_admin = info.is_admin();
    let claims = info.into_claims();

    let admin_token = if is_admin {
        Some(state.tokens.issue_admin_token(&claims)?)
    } else {
        None
    };

    Ok(LoginResponse {
        login: true,
        access_token: state.tokens.issue_access_token(&claims)?,
        refresh_token: state.tokens.issue_refresh_token(&claims)?,
        admin_token,
    })
}

/// Exchanges a refresh token for a new access token.
///
/// The password is checked again against the current hash, so refresh tokens
/// stop working once the password changes. The new token is built from the
/// freshly loaded account, not from the refresh token's payload.
pub async fn refresh(state: &AppState, refresh_token: &str, password: &str) -> Result<RefreshResponse, AppError> {
    let claims = state.tokens.verify(refresh_token, TokenKind::Refresh)?;
    let info = check_credentials(state.store(), &claims.email, password).await?;

    Ok(RefreshResponse {
        ok: true,
        access_token: state.tokens.issue_access_token(&info.into_claims())?,
    })
}
