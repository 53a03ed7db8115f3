//! Ownership bookkeeping between users, collections and todos.
//!
//! A user lists its collections in `collectionIds`, a collection lists its todos
//! in `todoIds`, and a todo points back at its collection. The store knows
//! nothing about these relations, so every mutation that touches a child list
//! goes through [`add_child`] or [`remove_child`].
//!
//! Both are a plain read-modify-write of the parent's list. Two concurrent
//! mutations of the same parent can race and the later write wins, dropping
//! the other's change. Multi-step operations are not transactional either: if a
//! collection is saved but attaching it to its user fails, the collection is
//! left orphaned.

use uuid::Uuid;

use crate::auth::Identity;
use crate::error::AppError;
use crate::models::{Collection, CollectionInput, Todo, TodoInput, User};
use crate::store::{DocumentStore, ParentRef};
use crate::validation::validate_input;

/// Appends `child` to the list of `parent`. No duplicate check is made.
pub async fn add_child(store: &dyn DocumentStore, parent: ParentRef, child: Uuid) -> Result<(), AppError> {
    let mut ids = store
        .child_ids(parent)
        .await?
        .ok_or_else(|| AppError::BadRequest(parent.missing_message().into()))?;
    ids.push(child);

    if !store.set_child_ids(parent, &ids).await? {
        return Err(AppError::BadRequest(parent.missing_message().into()));
    }
    log::debug!("{} now lists {} children", parent, ids.len());
    Ok(())
}

/// Removes the first occurrence of `child` from the list of `parent`.
/// Returns whether the child was listed.
pub async fn remove_child(store: &dyn DocumentStore, parent: ParentRef, child: Uuid) -> Result<bool, AppError> {
    let mut ids = store
        .child_ids(parent)
        .await?
        .ok_or_else(|| AppError::BadRequest(parent.missing_message().into()))?;

    let Some(position) = ids.iter().position(|id| *id == child) else {
        return Ok(false);
    };
    ids.remove(position);

    if !store.set_child_ids(parent, &ids).await? {
        return Err(AppError::BadRequest(parent.missing_message().into()));
    }
    log::debug!("{} unlisted {}", parent, child);
    Ok(true)
}

async fn load_user(store: &dyn DocumentStore, user_id: Uuid) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(ParentRef::User(user_id).missing_message().into()))
}

async fn load_collection(store: &dyn DocumentStore, collection_id: Uuid) -> Result<Collection, AppError> {
    store
        .find_collection(collection_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(ParentRef::Collection(collection_id).missing_message().into()))
}

async fn load_todo(store: &dyn DocumentStore, todo_id: Uuid) -> Result<Todo, AppError> {
    store
        .find_todo(todo_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("This todo doesn't exist".into()))
}

/// Non-admin callers may only reach collections listed on their own account.
pub async fn ensure_collection_access(
    store: &dyn DocumentStore,
    identity: &Identity,
    collection_id: Uuid,
) -> Result<(), AppError> {
    if identity.admin {
        return Ok(());
    }

    let user = load_user(store, identity.user_id()).await?;
    if user.collection_ids.contains(&collection_id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            ParentRef::Collection(collection_id).missing_message().into(),
        ))
    }
}

/// Same as [`ensure_collection_access`], addressed through a todo. Returns the todo.
pub async fn ensure_todo_access(
    store: &dyn DocumentStore,
    identity: &Identity,
    todo_id: Uuid,
) -> Result<Todo, AppError> {
    let todo = load_todo(store, todo_id).await?;
    ensure_collection_access(store, identity, todo.parent_collection_id).await?;
    Ok(todo)
}

/// Collections of `user_id` in list order. Ids that no longer resolve are skipped.
pub async fn collections_of_user(store: &dyn DocumentStore, user_id: Uuid) -> Result<Vec<Collection>, AppError> {
    let user = load_user(store, user_id).await?;

    let mut collections = Vec::with_capacity(user.collection_ids.len());
    for id in user.collection_ids {
        if let Some(collection) = store.find_collection(id).await? {
            collections.push(collection);
        }
    }
    Ok(collections)
}

pub async fn add_collection_to_user(
    store: &dyn DocumentStore,
    user_id: Uuid,
    input: CollectionInput,
) -> Result<Collection, AppError> {
    load_user(store, user_id).await?;
    validate_input(&input)?;

    let collection = Collection::new(input);
    store.insert_collection(&collection).await?;
    add_child(store, ParentRef::User(user_id), collection.id).await?;

    log::debug!("collection {} added to user {}", collection.id, user_id);
    Ok(collection)
}

/// Deletes a collection of `user_id` together with every todo it lists.
/// Returns the deleted collection and the updated user.
pub async fn delete_collection_of_user(
    store: &dyn DocumentStore,
    user_id: Uuid,
    collection_id: Uuid,
) -> Result<(Collection, User), AppError> {
    let user = load_user(store, user_id).await?;
    if !user.collection_ids.contains(&collection_id) {
        return Err(AppError::BadRequest(
            ParentRef::Collection(collection_id).missing_message().into(),
        ));
    }
    let collection = load_collection(store, collection_id).await?;

    for todo_id in &collection.todo_ids {
        store.delete_todo(*todo_id).await?;
    }
    let deleted = store
        .delete_collection(collection_id)
        .await?
        .unwrap_or(collection);

    remove_child(store, ParentRef::User(user_id), collection_id).await?;
    let user = load_user(store, user_id).await?;

    log::debug!(
        "collection {} of user {} deleted with {} todos",
        collection_id,
        user_id,
        deleted.todo_ids.len()
    );
    Ok((deleted, user))
}

/// Todos of a collection in list order. Ids that no longer resolve are skipped.
pub async fn todos_of_collection(store: &dyn DocumentStore, collection_id: Uuid) -> Result<Vec<Todo>, AppError> {
    let collection = load_collection(store, collection_id).await?;

    let mut todos = Vec::with_capacity(collection.todo_ids.len());
    for id in collection.todo_ids {
        if let Some(todo) = store.find_todo(id).await? {
            todos.push(todo);
        }
    }
    Ok(todos)
}

/// Creates a todo inside `collection_id`. Returns the todo and the updated collection.
pub async fn add_todo_in_collection(
    store: &dyn DocumentStore,
    collection_id: Uuid,
    input: TodoInput,
) -> Result<(Todo, Collection), AppError> {
    validate_input(&input)?;
    load_collection(store, collection_id).await?;

    let todo = Todo::new(input, collection_id);
    store.insert_todo(&todo).await?;
    add_child(store, ParentRef::Collection(collection_id), todo.id).await?;

    let collection = load_collection(store, collection_id).await?;
    Ok((todo, collection))
}

/// Flips `done` and returns the todo as stored afterwards.
pub async fn toggle_todo(store: &dyn DocumentStore, todo_id: Uuid) -> Result<Todo, AppError> {
    let todo = load_todo(store, todo_id).await?;
    store
        .set_todo_done(todo_id, !todo.done)
        .await?
        .ok_or_else(|| AppError::BadRequest("This todo doesn't exist".into()))
}

/// Deletes a todo and unlists it from its parent. Returns the deleted todo and
/// the updated collection.
pub async fn delete_todo(store: &dyn DocumentStore, todo_id: Uuid) -> Result<(Todo, Collection), AppError> {
    let todo = store
        .delete_todo(todo_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("This todo doesn't exist".into()))?;

    let parent = ParentRef::Collection(todo.parent_collection_id);
    remove_child(store, parent, todo.id).await?;
    let collection = load_collection(store, todo.parent_collection_id).await?;
    Ok((todo, collection))
}
