use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, ParentRef};
use crate::error::AppError;
use crate::models::{Collection, Todo, User, UserChanges};

#[derive(Default)]
struct Documents {
    users: Vec<User>,
    collections: Vec<Collection>,
    todos: Vec<Todo>,
}

impl Documents {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

/// In-process store. Each call takes the lock once, so single operations are
/// atomic but sequences of calls are not.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email(email: &str) -> AppError {
    AppError::StoreError(format!("duplicate key: email {:?} already exists", email))
}

fn take<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    let position = items.iter().position(matches)?;
    Some(items.remove(position))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut documents = self.documents.write().await;
        if documents.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }
        documents.users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.users.iter().find(|user| user.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.documents.read().await.users.clone())
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut documents = self.documents.write().await;
        if let Some(email) = &changes.email {
            if documents.email_taken(email, Some(id)) {
                return Err(duplicate_email(email));
            }
        }

        let Some(user) = documents.users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let mut documents = self.documents.write().await;
        Ok(take(&mut documents.users, |user| user.id == id))
    }

    async fn insert_collection(&self, collection: &Collection) -> Result<(), AppError> {
        self.documents.write().await.collections.push(collection.clone());
        Ok(())
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.collections.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_collection(&self, id: Uuid) -> Result<Option<Collection>, AppError> {
        let mut documents = self.documents.write().await;
        Ok(take(&mut documents.collections, |c| c.id == id))
    }

    async fn insert_todo(&self, todo: &Todo) -> Result<(), AppError> {
        self.documents.write().await.todos.push(todo.clone());
        Ok(())
    }

    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn set_todo_done(&self, id: Uuid, done: bool) -> Result<Option<Todo>, AppError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .map(|todo| {
                todo.done = done;
                todo.updated_at = Utc::now();
                todo.clone()
            }))
    }

    async fn delete_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let mut documents = self.documents.write().await;
        Ok(take(&mut documents.todos, |todo| todo.id == id))
    }

    async fn child_ids(&self, parent: ParentRef) -> Result<Option<Vec<Uuid>>, AppError> {
        let documents = self.documents.read().await;
        Ok(match parent {
            ParentRef::User(id) => documents
                .users
                .iter()
                .find(|user| user.id == id)
                .map(|user| user.collection_ids.clone()),
            ParentRef::Collection(id) => documents
                .collections
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.todo_ids.clone()),
        })
    }

    async fn set_child_ids(&self, parent: ParentRef, ids: &[Uuid]) -> Result<bool, AppError> {
        let mut documents = self.documents.write().await;
        let now = Utc::now();
        Ok(match parent {
            ParentRef::User(id) => match documents.users.iter_mut().find(|user| user.id == id) {
                Some(user) => {
                    user.collection_ids = ids.to_vec();
                    user.updated_at = now;
                    true
                }
                None => false,
            },
            ParentRef::Collection(id) => match documents.collections.iter_mut().find(|c| c.id == id) {
                Some(collection) => {
                    collection.todo_ids = ids.to_vec();
                    collection.updated_at = now;
                    true
                }
                None => false,
            },
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
