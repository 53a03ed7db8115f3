use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{DocumentStore, ParentRef};
use crate::error::AppError;
use crate::models::{Collection, Todo, User, UserChanges};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, roles, collection_ids, created_at, updated_at";
const COLLECTION_COLUMNS: &str = "id, name, color, todo_ids, created_at, updated_at";
const TODO_COLUMNS: &str = "id, name, done, parent_collection_id, created_at, updated_at";

/// Postgres-backed store. Each document kind lives in its own table and the
/// child lists are `uuid[]` columns, so there are no foreign keys between them.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::StoreError(e.to_string()))?;
        log::info!("database migrations applied");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, roles, collection_ids, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .bind(&user.collection_ids)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 password_hash = COALESCE($4, password_hash),
                 updated_at = now()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_collection(&self, collection: &Collection) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO collections (id, name, color, todo_ids, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(collection.id)
        .bind(&collection.name)
        .bind(&collection.color)
        .bind(&collection.todo_ids)
        .bind(collection.created_at)
        .bind(collection.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError> {
        let sql = format!("SELECT {} FROM collections WHERE id = $1", COLLECTION_COLUMNS);
        Ok(sqlx::query_as::<_, Collection>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError> {
        let sql = format!(
            "DELETE FROM collections WHERE id = $1 RETURNING {}",
            COLLECTION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Collection>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_todo(&self, todo: &Todo) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO todos (id, name, done, parent_collection_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(todo.id)
        .bind(&todo.name)
        .bind(todo.done)
        .bind(todo.parent_collection_id)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_todo_done(&self, id: Uuid, done: bool) -> Result<Option<Todo>, AppError> {
        let sql = format!(
            "UPDATE todos SET done = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            TODO_COLUMNS
        );
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(done)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let sql = format!("DELETE FROM todos WHERE id = $1 RETURNING {}", TODO_COLUMNS);
        Ok(sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn child_ids(&self, parent: ParentRef) -> Result<Option<Vec<Uuid>>, AppError> {
        let sql = match parent {
            ParentRef::User(_) => "SELECT collection_ids FROM users WHERE id = $1",
            ParentRef::Collection(_) => "SELECT todo_ids FROM collections WHERE id = $1",
        };
        let row = sqlx::query_as::<_, (Vec<Uuid>,)>(sql)
            .bind(parent.id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(ids,)| ids))
    }

    async fn set_child_ids(&self, parent: ParentRef, ids: &[Uuid]) -> Result<bool, AppError> {
        let sql = match parent {
            ParentRef::User(_) => {
                "UPDATE users SET collection_ids = $2, updated_at = now() WHERE id = $1"
            }
            ParentRef::Collection(_) => {
                "UPDATE collections SET todo_ids = $2, updated_at = now() WHERE id = $1"
            }
        };
        let result = sqlx::query(sql)
            .bind(parent.id())
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
