mod common;

use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use listkeeper::routes;
use serde_json::{json, Value};

use common::{seed_user, test_state, PASSWORD};

#[actix_rt::test]
async fn test_served_over_http() {
    let state = test_state();
    seed_user(&state, "wire@example.com", false).await;

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();

    let app_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    // Middleware rejections reach the client as a bare 401.
    let resp = client
        .get(format!("{}/api/collections/users", base))
        .send()
        .await
        .expect("unauthenticated request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().is_empty());

    let tokens: Value = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "email": "wire@example.com", "password": PASSWORD }))
        .send()
        .await
        .expect("login request")
        .json()
        .await
        .unwrap();
    let access = tokens["accessToken"].as_str().unwrap();

    let resp = client
        .post(format!("{}/api/collections/users", base))
        .bearer_auth(access)
        .json(&json!({ "name": "Wire" }))
        .send()
        .await
        .expect("add collection request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Wire");

    let resp = client
        .get(format!("{}/definitely/missing", base))
        .send()
        .await
        .expect("unmatched request");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    handle.stop(true).await;
}
