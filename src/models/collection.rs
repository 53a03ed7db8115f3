use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{DeclaredFields, COLOR_REGEX};

/// Display color given to collections created without one.
pub const DEFAULT_COLOR: &str = "#DDE1E4";

/// A named folder of todos owned by exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub todo_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(input: CollectionInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            todo_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CollectionInput {
    #[validate(length(min = 1, message = "\"name\" is not allowed to be empty"))]
    pub name: String,
    #[validate(regex(path = "COLOR_REGEX", message = "\"color\" must be a #RRGGBB value"))]
    pub color: Option<String>,
}

impl DeclaredFields for CollectionInput {
    const FIELDS: &'static [&'static str] = &["name", "color"];
}

/// Body of `DELETE /api/collections/users`.
#[derive(Debug, Deserialize)]
pub struct DeleteCollectionRequest {
    pub collection: Uuid,
}
