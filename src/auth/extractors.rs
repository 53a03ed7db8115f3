use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::Identity;
use crate::error::AppError;

/// Extracts the caller that `AuthMiddleware` attached to the request.
///
/// Handlers reachable without the middleware get `AppError::Unauthorized`.
impl FromRequest for Identity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned();
        ready(identity.ok_or_else(|| {
            ActixError::from(AppError::Unauthorized(format!(
                "no verified caller attached to {}",
                req.path()
            )))
        }))
    }
}
