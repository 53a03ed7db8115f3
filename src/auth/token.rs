use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an access token, in seconds.
pub const ACCESS_TOKEN_TTL: i64 = 1800;
/// Lifetime of a refresh token, in seconds (one year).
pub const REFRESH_TOKEN_TTL: i64 = 365 * 24 * 60 * 60;

/// The three token classes. Each one is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    /// Never expires.
    Admin,
}

impl TokenKind {
    pub fn lifetime(&self) -> Option<i64> {
        match self {
            TokenKind::Access => Some(ACCESS_TOKEN_TTL),
            TokenKind::Refresh => Some(REFRESH_TOKEN_TTL),
            TokenKind::Admin => None,
        }
    }
}

/// Represents the claims encoded within every token: the sanitized login
/// information of a user plus the standard time claims.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token, the user's id.
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp. Absent on admin tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(sub: Uuid, email: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            sub,
            email: email.into(),
            roles,
            iat: 0,
            exp: None,
        }
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access, refresh and admin tokens (HS256).
///
/// Keys are derived once from the configured secrets; nothing is read from the
/// environment after construction.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    admin: KeyPair,
}

impl TokenService {
    pub fn new(access_secret: &str, refresh_secret: &str, admin_secret: &str) -> Self {
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            admin: KeyPair::from_secret(admin_secret),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            &config.admin_token_secret,
        )
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::Admin => &self.admin,
        }
    }

    pub fn issue_access_token(&self, claims: &Claims) -> Result<String, AppError> {
        self.issue(TokenKind::Access, claims)
    }

    pub fn issue_refresh_token(&self, claims: &Claims) -> Result<String, AppError> {
        self.issue(TokenKind::Refresh, claims)
    }

    pub fn issue_admin_token(&self, claims: &Claims) -> Result<String, AppError> {
        self.issue(TokenKind::Admin, claims)
    }

    /// Signs `claims` as a token of `kind`. Any `iat`/`exp` already present
    /// on the payload is replaced.
    pub fn issue(&self, kind: TokenKind, claims: &Claims) -> Result<String, AppError> {
        self.issue_at(kind, claims, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, kind: TokenKind, claims: &Claims, issued_at: i64) -> Result<String, AppError> {
        let claims = Claims {
            iat: issued_at,
            exp: kind.lifetime().map(|ttl| issued_at + ttl),
            ..claims.clone()
        };

        encode(&Header::default(), &claims, &self.keys(kind).encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token against the secret of `kind` and returns its claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature
    /// does not match, or it has expired.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if kind.lifetime().is_none() {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }

        decode::<Claims>(token, &self.keys(kind).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid {:?} token: {}", kind, e)))
    }
}
