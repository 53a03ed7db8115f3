use crate::{
    auth::{authenticate, hash_password, AuthTier, Identity},
    error::AppError,
    models::{NewUser, User, UserChanges, UserUpdate},
    state::AppState,
    validation::validate_input,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// Lists every account, oldest first. Admin only.
pub async fn list_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let users = state.store().list_users().await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": users })))
}

/// Creates a new account.
///
/// ## Request Body:
/// `{name, email, password, auth?}`. `auth` defaults to `["normal"]`; asking for
/// any other role requires an admin token in the `Authorization` header.
///
/// ## Responses:
/// - `201 Created`: `{ok, data: user}`.
/// - `400 Bad Request`: validation failure or an email that is already registered.
/// - `401 Unauthorized`: elevated roles requested without an admin token.
pub async fn create_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    user_data: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    let input = user_data.into_inner();
    validate_input(&input)?;

    if input.requests_elevated_roles() {
        authenticate(req.headers(), &state.tokens, AuthTier::AdminOnly)?;
    }

    if state.store().find_user_by_email(&input.email).await?.is_some() {
        return Err(AppError::BadRequest("This email already exists".into()));
    }

    let password_hash = hash_password(&input.password, state.bcrypt_cost)?;
    let user = User::new(input, password_hash);
    state.store().insert_user(&user).await?;

    log::info!("user {} created with roles {:?}", user.id, user.roles);
    Ok(HttpResponse::Created().json(json!({ "ok": true, "data": user })))
}

async fn current_user(state: &AppState, identity: &Identity) -> Result<User, AppError> {
    state
        .store()
        .find_user(identity.user_id())
        .await?
        .ok_or_else(|| AppError::BadRequest("There is no user with this ID".into()))
}

pub async fn get_me(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let user = current_user(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": user })))
}

/// Updates name, email and/or password of the caller. A new password is re-hashed.
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    update: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    let update = update.into_inner();
    validate_input(&update)?;

    let password_hash = match &update.password {
        Some(password) => Some(hash_password(password, state.bcrypt_cost)?),
        None => None,
    };
    let changes = UserChanges {
        name: update.name,
        email: update.email,
        password_hash,
    };

    let user = if changes.is_empty() {
        current_user(&state, &identity).await?
    } else {
        state
            .store()
            .update_user(identity.user_id(), &changes)
            .await?
            .ok_or_else(|| AppError::BadRequest("There is no user with this ID".into()))?
    };

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": user })))
}

/// Deletes the caller's account. Its collections and todos are left in place.
pub async fn delete_me(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let user = state
        .store()
        .delete_user(identity.user_id())
        .await?
        .ok_or_else(|| AppError::BadRequest("There is no user with this ID".into()))?;

    log::info!("user {} deleted", user.id);
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": format!("{} has been removed", user.id),
        "data": user
    })))
}
