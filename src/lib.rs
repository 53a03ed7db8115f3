#![doc = "The `listkeeper` library crate."]
#![doc = ""]
#![doc = "Users own collections, collections own todos, and every route is guarded by"]
#![doc = "one of three signed token classes (access, refresh, admin). This crate holds the"]
#![doc = "domain models, the document store seam, the ownership bookkeeping, the"]
#![doc = "authentication chain and the HTTP routes. `main.rs` only wires them into a server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

pub use crate::error::AppError;
pub use crate::state::AppState;
