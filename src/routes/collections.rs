//! Collection and todo endpoints. Every route here sits behind standard auth.

use crate::{
    auth::Identity,
    error::AppError,
    models::{CollectionInput, DeleteCollectionRequest, TodoInput},
    ownership,
    state::AppState,
};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// `GET /api/collections/users`: the caller's collections in creation order.
pub async fn get_all_collections(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let collections = ownership::collections_of_user(state.store(), identity.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": collections })))
}

/// `POST /api/collections/users`
pub async fn add_collection(
    state: web::Data<AppState>,
    identity: Identity,
    input: web::Json<CollectionInput>,
) -> Result<impl Responder, AppError> {
    let collection =
        ownership::add_collection_to_user(state.store(), identity.user_id(), input.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": collection })))
}

/// `DELETE /api/collections/users` with body `{collection}`. Deletes the todos too.
pub async fn delete_collection(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<DeleteCollectionRequest>,
) -> Result<impl Responder, AppError> {
    let (deleted, user) =
        ownership::delete_collection_of_user(state.store(), identity.user_id(), body.collection)
            .await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "user": user,
        "deletedCollection": deleted
    })))
}

/// `GET /api/collections/todo/{id}` where `id` is a collection.
pub async fn get_todos(
    state: web::Data<AppState>,
    identity: Identity,
    collection_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let collection_id = collection_id.into_inner();
    ownership::ensure_collection_access(state.store(), &identity, collection_id).await?;

    let todos = ownership::todos_of_collection(state.store(), collection_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": todos })))
}

/// `POST /api/collections/todo/{id}` where `id` is a collection.
pub async fn add_todo(
    state: web::Data<AppState>,
    identity: Identity,
    collection_id: web::Path<Uuid>,
    input: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let collection_id = collection_id.into_inner();
    ownership::ensure_collection_access(state.store(), &identity, collection_id).await?;

    let (todo, collection) =
        ownership::add_todo_in_collection(state.store(), collection_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "data": collection,
        "todo": todo
    })))
}

/// `PATCH /api/collections/todo/{id}` where `id` is a todo. Flips `done`.
pub async fn toggle_todo(
    state: web::Data<AppState>,
    identity: Identity,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo_id = todo_id.into_inner();
    ownership::ensure_todo_access(state.store(), &identity, todo_id).await?;

    let todo = ownership::toggle_todo(state.store(), todo_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "data": { "id": todo.id, "mutateTo": todo.done }
    })))
}

/// `DELETE /api/collections/todo/{id}` where `id` is a todo.
pub async fn delete_todo(
    state: web::Data<AppState>,
    identity: Identity,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo_id = todo_id.into_inner();
    ownership::ensure_todo_access(state.store(), &identity, todo_id).await?;

    let (deleted, collection) = ownership::delete_todo(state.store(), todo_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "data": {
            "deletedTodo": deleted,
            "updatedCollection": collection
        }
    })))
}
