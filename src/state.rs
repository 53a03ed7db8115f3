use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::config::Config;
use crate::store::DocumentStore;

/// Shared, immutable per-process state handed to every handler through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(config),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
