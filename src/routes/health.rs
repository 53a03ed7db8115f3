use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// Health check endpoint
///
/// Reports whether the document store answers, along with the current timestamp.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let store = match state.store().ping().await {
        Ok(()) => "ok",
        Err(e) => {
            log::warn!("health check: store unavailable: {}", e);
            "unavailable"
        }
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "store": store,
        "timestamp": Utc::now()
    }))
}
