use actix_web::{http::header::ContentType, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::error::AppError;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const NOT_FOUND_HTML: &str = include_str!("../../static/404.html");

/// `GET /` (admin only): static index page.
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

/// `GET /api` (admin only).
pub async fn api_home() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "listkeeper API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn not_found_page() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(NOT_FOUND_HTML)
}

/// Fallback for every unmatched route or method. Rendered by `AppError::NotFound`.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::debug!("no route for {} {}", req.method(), req.path());
    Err(AppError::NotFound(req.path().to_string()))
}
