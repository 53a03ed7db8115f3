use crate::{
    auth::{self, middleware::bearer_token, LoginRequest, RefreshRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// Login user
///
/// Checks the credentials and returns access and refresh tokens, plus an admin
/// token for admin accounts. Unknown email and wrong password both answer
/// `401 {"login": false}`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    match auth::login(&state, &login_data.email, &login_data.password).await {
        Ok(tokens) => Ok(HttpResponse::Ok().json(tokens)),
        Err(AppError::Unauthorized(reason)) => {
            log::debug!("login rejected: {}", reason);
            Ok(HttpResponse::Unauthorized().json(json!({ "login": false })))
        }
        Err(e) => Err(e),
    }
}

/// Refresh access token
///
/// Expects the refresh token as bearer and the account password in the body.
/// The bearer is checked first, so a request without one is a 401 whatever its body.
#[post("/token/refresh")]
pub async fn refresh_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<impl Responder, AppError> {
    let token = bearer_token(req.headers())?;
    let body = body.ok_or_else(|| AppError::BadRequest("\"password\" is required".into()))?;
    let refreshed = auth::refresh(&state, token, &body.password).await?;
    Ok(HttpResponse::Ok().json(refreshed))
}
