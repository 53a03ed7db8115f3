//! Document store seam.
//!
//! Handlers never talk to a database directly; they go through [`DocumentStore`],
//! which offers find/update/delete by id or email and nothing more. Id lists
//! (`collectionIds`, `todoIds`) are read and overwritten as whole values through
//! [`DocumentStore::child_ids`] and [`DocumentStore::set_child_ids`]; keeping them
//! consistent is the job of [`crate::ownership`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Collection, Todo, User, UserChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A document that owns an ordered list of child ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// A user and its `collectionIds`.
    User(Uuid),
    /// A collection and its `todoIds`.
    Collection(Uuid),
}

impl ParentRef {
    pub fn id(&self) -> Uuid {
        match self {
            ParentRef::User(id) | ParentRef::Collection(id) => *id,
        }
    }

    /// Message reported when the parent document is gone.
    pub fn missing_message(&self) -> &'static str {
        match self {
            ParentRef::User(_) => "There is no user with this ID",
            ParentRef::Collection(_) => "This collection doesn't exist",
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParentRef::User(id) => write!(f, "user {}", id),
            ParentRef::Collection(id) => write!(f, "collection {}", id),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with `StoreError` when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn insert_collection(&self, collection: &Collection) -> Result<(), AppError>;
    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError>;
    async fn delete_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError>;

    async fn insert_todo(&self, todo: &Todo) -> Result<(), AppError>;
    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError>;
    async fn set_todo_done(&self, id: Uuid, done: bool) -> Result<Option<Todo>, AppError>;
    async fn delete_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError>;

    /// Current child list of `parent`, or `None` if the parent does not exist.
    async fn child_ids(&self, parent: ParentRef) -> Result<Option<Vec<Uuid>>, AppError>;
    /// Overwrites the child list of `parent`. Returns `false` if the parent does not exist.
    async fn set_child_ids(&self, parent: ParentRef, ids: &[Uuid]) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Opens the store selected by `DATABASE_URL`.
pub async fn connect(config: &Config) -> Result<Arc<dyn DocumentStore>, AppError> {
    if config.uses_memory_store() {
        log::warn!("using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(&config.database_url).await?;
    Ok(Arc::new(store))
}
