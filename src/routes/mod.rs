pub mod auth;
pub mod collections;
pub mod health;
pub mod home;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Malformed JSON bodies and unparsable path ids are plain 400s.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Methods a resource does not serve fall through to the 404 page.
fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::route().to(home::not_found))
}

/// Registers the whole HTTP surface. `AppState` must be provided as app data.
///
/// Auth is attached per route, never per scope, so unmatched paths and methods
/// reach the 404 page without a token.
pub fn config(cfg: &mut web::ServiceConfig) {
    let standard = AuthMiddleware::standard;
    let admin_only = AuthMiddleware::admin_only;

    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(resource("/").route(web::get().to(home::index).wrap(admin_only())))
        .service(
            web::scope("/api")
                .service(resource("").route(web::get().to(home::api_home).wrap(admin_only())))
                .service(
                    web::scope("/auth")
                        .service(auth::login)
                        .service(auth::refresh_token),
                )
                .service(
                    web::scope("/users")
                        .service(
                            resource("")
                                .route(web::get().to(users::list_users).wrap(admin_only()))
                                .route(web::post().to(users::create_user)),
                        )
                        .service(
                            resource("/me")
                                .route(web::get().to(users::get_me).wrap(standard()))
                                .route(web::patch().to(users::update_me).wrap(standard()))
                                .route(web::delete().to(users::delete_me).wrap(standard())),
                        ),
                )
                .service(
                    web::scope("/collections")
                        .service(
                            resource("/users")
                                .route(web::get().to(collections::get_all_collections).wrap(standard()))
                                .route(web::post().to(collections::add_collection).wrap(standard()))
                                .route(web::delete().to(collections::delete_collection).wrap(standard())),
                        )
                        .service(
                            resource("/todo/{id}")
                                .route(web::get().to(collections::get_todos).wrap(standard()))
                                .route(web::post().to(collections::add_todo).wrap(standard()))
                                .route(web::patch().to(collections::toggle_todo).wrap(standard()))
                                .route(web::delete().to(collections::delete_todo).wrap(standard())),
                        ),
                ),
        )
        .default_service(web::route().to(home::not_found));
}
