use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::DeclaredFields;

/// A single todo. `parent_collection_id` points back at the collection listing it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
    pub parent_collection_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(input: TodoInput, parent_collection_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            done: false,
            parent_collection_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1, message = "\"name\" is not allowed to be empty"))]
    pub name: String,
}

impl DeclaredFields for TodoInput {
    const FIELDS: &'static [&'static str] = &["name"];
}
