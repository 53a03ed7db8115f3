#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{test, web};
use serde_json::Value;
use listkeeper::auth::{self, hash_password, LoginResponse};
use listkeeper::config::Config;
use listkeeper::models::{NewUser, User, ADMIN_ROLE, DEFAULT_ROLE};
use listkeeper::store::MemoryStore;
use listkeeper::AppState;

pub const PASSWORD: &str = "Abcdefg1";

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "memory://"),
        ("ACCESS_TOKEN_SECRET", "integration-access"),
        ("REFRESH_TOKEN_SECRET", "integration-refresh"),
        ("ADMIN_TOKEN_SECRET", "integration-admin"),
        ("BCRYPT_COST", "4"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(&test_config(), Arc::new(MemoryStore::new())))
}

/// Inserts an account directly through the store, bypassing signup.
pub async fn seed_user(state: &AppState, email: &str, admin: bool) -> User {
    let mut roles = vec![DEFAULT_ROLE.to_string()];
    if admin {
        roles.push(ADMIN_ROLE.to_string());
    }
    let input = NewUser {
        name: "Seeded".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        auth: Some(roles),
    };
    let hash = hash_password(PASSWORD, state.bcrypt_cost).expect("hashing works");
    let user = User::new(input, hash);
    state.store().insert_user(&user).await.expect("seed insert");
    user
}

pub async fn login(state: &AppState, email: &str) -> LoginResponse {
    auth::login(state, email, PASSWORD).await.expect("seeded login")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Status and body of one exchange with the test service.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// Calls the service and renders errors raised by middleware the way the
/// HTTP dispatcher would, so rejected requests can be asserted on too.
pub async fn send<S, B>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            Reply { status, body }
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body()).await.unwrap_or_default();
            Reply { status, body }
        }
    }
}
