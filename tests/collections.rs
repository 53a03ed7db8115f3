mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use listkeeper::models::DEFAULT_COLOR;
use listkeeper::routes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{bearer, login, seed_user, send, test_state};

#[actix_rt::test]
async fn test_collection_and_todo_lifecycle() {
    let state = test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": "A", "email": "a@x.com", "password": "Abcdefg1" }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::CREATED, "signup: {:?}", reply.body);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "Abcdefg1" }))
        .to_request();
    let tokens = send(&app, req).await.json();
    assert!(!tokens["accessToken"].as_str().unwrap().is_empty());
    assert!(!tokens["refreshToken"].as_str().unwrap().is_empty());
    assert!(tokens.get("adminToken").is_none());
    let access = tokens["accessToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/collections/users")
        .insert_header(bearer(&access))
        .set_json(json!({ "name": "Work" }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::OK);
    let collection = reply.json()["data"].clone();
    assert_eq!(collection["name"], "Work");
    assert_eq!(collection["color"], DEFAULT_COLOR);
    assert_eq!(collection["todoIds"], json!([]));
    let collection_id = collection["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/collections/todo/{}", collection_id))
        .insert_header(bearer(&access))
        .set_json(json!({ "name": "Buy milk" }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let body = reply.json();
    assert_eq!(body["data"]["todoIds"].as_array().unwrap().len(), 1);
    assert_eq!(body["todo"]["done"], false);
    assert_eq!(body["todo"]["parentCollectionId"], collection_id.as_str());
    let todo_id = body["todo"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/collections/todo/{}", collection_id))
        .insert_header(bearer(&access))
        .to_request();
    let todos = send(&app, req).await.json();
    assert_eq!(todos["data"][0]["name"], "Buy milk");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/collections/todo/{}", todo_id))
        .insert_header(bearer(&access))
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["data"], json!({ "id": todo_id, "mutateTo": true }));

    let req = test::TestRequest::delete()
        .uri("/api/collections/users")
        .insert_header(bearer(&access))
        .set_json(json!({ "collection": collection_id }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["deletedCollection"]["id"], collection_id.as_str());
    assert_eq!(body["user"]["collectionIds"], json!([]));

    // The cascade removed the todo as well.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/collections/todo/{}", todo_id))
        .insert_header(bearer(&access))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["ok"], false);
}

#[actix_rt::test]
async fn test_collections_listed_in_creation_order() {
    let state = test_state();
    seed_user(&state, "a@x.com", false).await;
    let access = login(&state, "a@x.com").await.access_token;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    for (name, color) in [("Home", None), ("Work", Some("#112233")), ("Errands", None)] {
        let mut payload = json!({ "name": name });
        if let Some(color) = color {
            payload["color"] = Value::from(color);
        }
        let req = test::TestRequest::post()
            .uri("/api/collections/users")
            .insert_header(bearer(&access))
            .set_json(payload)
            .to_request();
        assert_eq!(send(&app, req).await.status, StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/collections/users")
        .insert_header(bearer(&access))
        .to_request();
    let body = send(&app, req).await.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Home", "Work", "Errands"]);
    assert_eq!(body["data"][1]["color"], "#112233");
}

#[actix_rt::test]
async fn test_toggle_twice_and_delete_todo() {
    let state = test_state();
    seed_user(&state, "a@x.com", false).await;
    let access = login(&state, "a@x.com").await.access_token;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/api/collections/users")
        .insert_header(bearer(&access))
        .set_json(json!({ "name": "Work" }))
        .to_request();
    let collection_id = send(&app, req).await.json()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/collections/todo/{}", collection_id))
        .insert_header(bearer(&access))
        .set_json(json!({ "name": "Buy milk" }))
        .to_request();
    let todo_id = send(&app, req).await.json()["todo"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    for expected in [true, false] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/collections/todo/{}", todo_id))
            .insert_header(bearer(&access))
            .to_request();
        assert_eq!(send(&app, req).await.json()["data"]["mutateTo"], expected);
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/collections/todo/{}", todo_id))
        .insert_header(bearer(&access))
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["data"]["deletedTodo"]["id"], todo_id.as_str());
    assert_eq!(body["data"]["updatedCollection"]["todoIds"], json!([]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/collections/todo/{}", todo_id))
        .insert_header(bearer(&access))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "This todo doesn't exist");
}

#[actix_rt::test]
async fn test_foreign_collection_is_hidden_from_normal_users() {
    let state = test_state();
    seed_user(&state, "owner@x.com", false).await;
    seed_user(&state, "other@x.com", false).await;
    seed_user(&state, "root@x.com", true).await;
    let owner = login(&state, "owner@x.com").await.access_token;
    let other = login(&state, "other@x.com").await.access_token;
    let admin = login(&state, "root@x.com").await.admin_token.unwrap();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let req = test::TestRequest::post()
        .uri("/api/collections/users")
        .insert_header(bearer(&owner))
        .set_json(json!({ "name": "Private" }))
        .to_request();
    let collection_id = send(&app, req).await.json()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/collections/todo/{}", collection_id))
        .insert_header(bearer(&other))
        .set_json(json!({ "name": "Sneaky" }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "This collection doesn't exist");

    let req = test::TestRequest::delete()
        .uri("/api/collections/users")
        .insert_header(bearer(&other))
        .set_json(json!({ "collection": collection_id }))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::BAD_REQUEST);

    // Admins bypass the ownership check.
    let req = test::TestRequest::get()
        .uri(&format!("/api/collections/todo/{}", collection_id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_invalid_collection_and_todo_input() {
    let state = test_state();
    seed_user(&state, "a@x.com", false).await;
    let access = login(&state, "a@x.com").await.access_token;
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    for payload in [
        json!({ "name": "" }),
        json!({ "name": "Work", "color": "red" }),
        json!({}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/collections/users")
            .insert_header(bearer(&access))
            .set_json(&payload)
            .to_request();
        let reply = send(&app, req).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(reply.json()["ok"], false);
    }

    let req = test::TestRequest::get()
        .uri("/api/collections/todo/not-a-uuid")
        .insert_header(bearer(&access))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/collections/todo/{}", uuid::Uuid::new_v4()))
        .insert_header(bearer(&access))
        .set_json(json!({ "name": "Orphan" }))
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "This collection doesn't exist");
}
