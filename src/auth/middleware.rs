use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::auth::token::{Claims, TokenKind, TokenService};
use crate::error::AppError;
use crate::state::AppState;

/// Which credentials a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTier {
    /// Admin token first, then access token.
    Standard,
    /// Admin token only.
    AdminOnly,
}

/// The caller attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub claims: Claims,
    /// Set when the request was authenticated with an admin token.
    pub admin: bool,
}

impl Identity {
    pub fn user_id(&self) -> Uuid {
        self.claims.sub
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))
}

/// Resolves the caller for `tier`.
///
/// Standard routes try the admin secret first so that an admin token passes
/// everywhere; at most two verifications are attempted.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    tier: AuthTier,
) -> Result<Identity, AppError> {
    let token = bearer_token(headers)?;

    match tokens.verify(token, TokenKind::Admin) {
        Ok(claims) => Ok(Identity {
            claims,
            admin: true,
        }),
        Err(admin_err) => match tier {
            AuthTier::AdminOnly => Err(admin_err),
            AuthTier::Standard => tokens
                .verify(token, TokenKind::Access)
                .map(|claims| Identity {
                    claims,
                    admin: false,
                }),
        },
    }
}

/// Gates every route it wraps behind a bearer token of the given tier and
/// stores the resulting [`Identity`] in the request extensions.
pub struct AuthMiddleware {
    tier: AuthTier,
}

impl AuthMiddleware {
    pub fn standard() -> Self {
        Self {
            tier: AuthTier::Standard,
        }
    }

    pub fn admin_only() -> Self {
        Self {
            tier: AuthTier::AdminOnly,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tier: self.tier,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tier: AuthTier,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match req.app_data::<web::Data<AppState>>() {
            Some(state) => authenticate(req.headers(), &state.tokens, self.tier),
            None => Err(AppError::InternalServerError(
                "application state is not configured".into(),
            )),
        };

        match outcome {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}
