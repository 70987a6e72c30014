use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use recado_api::auth::{AppState, AppStateInner};
use recado_api::middleware::ADMIN_HEADER;
use recado_core::Network;
use recado_db::Database;

const ADMIN: &str = "admin-secret";

fn app_with_state() -> (Router, AppState) {
    let state = AppStateInner::new(
        Network::new(),
        Database::open_in_memory().unwrap(),
        "test-secret".into(),
        Some(ADMIN.into()),
    );
    (recado_api::router(state.clone()), state)
}

fn app() -> Router {
    app_with_state().0
}

async fn admin(app: &Router, uri: &str) -> StatusCode {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(ADMIN_HEADER, ADMIN)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap().status()
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, login: &str, name: &str) -> String {
    let (status, _) = call(
        app,
        "POST",
        "/users",
        None,
        Some(json!({ "login": login, "password": "senha123", "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        "POST",
        "/sessions",
        None,
        Some(json!({ "login": login, "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn friendship_and_recados() {
    let app = app();
    let maria = register(&app, "maria", "Maria").await;
    let joao = register(&app, "joao", "Joao").await;

    let (status, body) = call(&app, "POST", "/friends/joao", Some(&maria), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "invited");

    let (status, body) = call(&app, "POST", "/friends/joao", Some(&maria), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("waiting for acceptance"));

    let (_, body) = call(&app, "POST", "/friends/maria", Some(&joao), None).await;
    assert_eq!(body["status"], "accepted");

    let (_, body) = call(&app, "GET", "/users/maria/friends", None, None).await;
    assert_eq!(body["users"], json!(["joao"]));
    let (_, body) = call(&app, "GET", "/friends/maria", Some(&joao), None).await;
    assert_eq!(body["related"], true);

    let (status, _) = call(&app, "POST", "/recados/joao", Some(&maria), Some(json!({ "content": "oi" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&app, "POST", "/inbox/recados/next", Some(&joao), None).await;
    assert_eq!(body["message"], "maria: oi");
    let (status, _) = call(&app, "POST", "/inbox/recados/next", Some(&joao), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enemies_block_and_sessions_are_required() {
    let app = app();
    let maria = register(&app, "maria", "Maria").await;
    let joao = register(&app, "joao", "Joao").await;

    let (status, _) = call(&app, "POST", "/enemies/joao", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "POST", "/enemies/joao", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "POST", "/enemies/joao", Some(&maria), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, "POST", "/recados/maria", Some(&joao), Some(json!({ "content": "hey" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "invalid operation: maria is your enemy");

    let (status, _) = call(&app, "POST", "/crushes/maria", Some(&joao), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_attributes() {
    let app = app();
    let maria = register(&app, "maria", "Maria Silva").await;

    let (_, body) = call(&app, "GET", "/users/maria/attributes/nome", None, None).await;
    assert_eq!(body["value"], "Maria Silva");

    let (status, _) = call(&app, "GET", "/users/maria/attributes/cidade", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "PUT", "/profile/cidade", Some(&maria), Some(json!({ "value": "Maceio" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = call(&app, "GET", "/users/maria/attributes/cidade", None, None).await;
    assert_eq!(body["value"], "Maceio");

    let (status, _) = call(&app, "PUT", "/profile/nome", Some(&maria), Some(json!({ "value": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/sessions",
        None,
        Some(json!({ "login": "maria", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn communities_and_account_removal() {
    let app = app();
    let maria = register(&app, "maria", "Maria").await;
    let joao = register(&app, "joao", "Joao").await;

    let (status, _) = call(
        &app,
        "POST",
        "/communities",
        Some(&maria),
        Some(json!({ "name": "ufal", "description": "Universidade" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    call(&app, "POST", "/communities/ufal/members", Some(&joao), None).await;
    let (_, body) = call(&app, "GET", "/communities/ufal", None, None).await;
    assert_eq!(body["owner"], "maria");
    assert_eq!(body["members"], json!(["maria", "joao"]));

    let (_, body) = call(&app, "GET", "/users/joao/communities", None, None).await;
    assert_eq!(body["communities"], json!(["ufal"]));

    call(&app, "POST", "/communities/ufal/messages", Some(&joao), Some(json!({ "content": "ola" }))).await;
    let (_, body) = call(&app, "POST", "/inbox/messages/next", Some(&maria), None).await;
    assert_eq!(body["message"], "ola");

    call(&app, "POST", "/recados/joao", Some(&maria), Some(json!({ "content": "tchau" }))).await;
    let (status, _) = call(&app, "DELETE", "/users/me", Some(&maria), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/communities/ufal", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/inbox/recados/next", Some(&joao), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "DELETE", "/users/me", Some(&maria), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn system_routes_require_admin_token() {
    let app = app();
    register(&app, "maria", "Maria").await;

    let (status, _) = call(&app, "POST", "/system/reset", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(admin(&app, "/system/reset").await, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/users/maria/friends", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_named_read_can_receive_recados() {
    let app = app();
    let maria = register(&app, "maria", "Maria").await;
    let joao = register(&app, "joao", "Joao").await;
    let read = register(&app, "read", "Read").await;

    call(&app, "POST", "/recados/maria", Some(&joao), Some(json!({ "content": "precious" }))).await;
    let (status, _) = call(&app, "POST", "/recados/read", Some(&maria), Some(json!({ "content": "hello read" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&app, "POST", "/inbox/recados/next", Some(&maria), None).await;
    assert_eq!(body["message"], "joao: precious");
    let (_, body) = call(&app, "POST", "/inbox/recados/next", Some(&read), None).await;
    assert_eq!(body["message"], "maria: hello read");
}

#[tokio::test]
async fn sessions_do_not_survive_account_removal() {
    let app = app();
    let old = register(&app, "maria", "Maria").await;
    let (status, _) = call(&app, "DELETE", "/users/me", Some(&old), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let new = register(&app, "maria", "Outra Maria").await;
    let (status, _) = call(&app, "PUT", "/profile/cidade", Some(&old), Some(json!({ "value": "hijacked" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/users/maria/attributes/cidade", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "PUT", "/profile/cidade", Some(&new), Some(json!({ "value": "Maceio" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = call(&app, "GET", "/users/maria/attributes/cidade", None, None).await;
    assert_eq!(body["value"], "Maceio");
}

#[tokio::test]
async fn save_never_resurrects_reset_state() {
    let (app, state) = app_with_state();
    register(&app, "maria", "Maria").await;

    assert_eq!(admin(&app, "/system/save").await, StatusCode::NO_CONTENT);
    assert_eq!(state.db.load().unwrap().users.len(), 1);
    assert_eq!(admin(&app, "/system/reset").await, StatusCode::NO_CONTENT);
    assert!(state.db.load().unwrap().is_empty());

    for _ in 0..20 {
        register(&app, "maria", "Maria").await;
        let (saved, reset) = tokio::join!(admin(&app, "/system/save"), admin(&app, "/system/reset"));
        assert_eq!(saved, StatusCode::NO_CONTENT);
        assert_eq!(reset, StatusCode::NO_CONTENT);
        assert!(state.db.load().unwrap().is_empty());
    }
}
