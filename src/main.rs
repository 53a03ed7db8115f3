use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use listkeeper::{config::Config, routes, store, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match store::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("failed to open the document store: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(&config, store));

    log::info!("Starting listkeeper server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
