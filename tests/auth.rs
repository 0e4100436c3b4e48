mod common;

use common::{assertion_claims, sign_assertion, spawn_app};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn sign_in_mirrors_the_identity_and_returns_a_token() {
    let app = spawn_app().await;
    let response = app
        .session(assertion_claims("g-1", Some("maria@example.com"), Some("Maria")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "maria@example.com");
    assert_eq!(body["user"]["name"], "Maria");
    assert_eq!(body["user"]["image"], "https://images.example.com/g-1.png");

    let token = body["user"]["token"].as_str().unwrap();
    let response = app.get("/user", Some(token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let current: Value = response.json().await.unwrap();
    assert_eq!(current["user"]["id"], body["user"]["id"]);
}

#[tokio::test]
async fn repeated_sign_in_keeps_the_same_user() {
    let app = spawn_app().await;
    let first = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let second = app.sign_in("g-1", "maria@example.com", "Maria Silva").await;
    assert_eq!(first.id, second.id);

    let body: Value = app
        .get("/user", Some(&second.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["user"]["name"], "Maria Silva");
}

#[tokio::test]
async fn accounts_with_the_same_email_share_a_user() {
    let app = spawn_app().await;
    let google = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let other = app.sign_in("other-77", "maria@example.com", "Maria").await;
    assert_eq!(google.id, other.id);
}

#[tokio::test]
async fn name_falls_back_to_email_local_part() {
    let app = spawn_app().await;
    let response = app
        .session(assertion_claims("g-2", Some("joao@example.com"), None))
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["name"], "joao");
}

#[tokio::test]
async fn sign_in_without_email_is_refused() {
    let app = spawn_app().await;
    let response = app.session(assertion_claims("g-3", None, Some("Nobody"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn forged_assertion_is_rejected() {
    let app = spawn_app().await;
    let assertion = sign_assertion(
        "not-the-provider-secret",
        assertion_claims("g-1", Some("maria@example.com"), Some("Maria")),
    );
    let response = app
        .post("/auth/session", None, Some(json!({ "assertion": assertion })))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn current_user_requires_a_valid_token() {
    let app = spawn_app().await;
    assert_eq!(
        app.get("/user", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get("/user", Some("garbage")).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let response = app
        .client
        .get(app.url("/user"))
        .header("Authorization", "Token abc")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_updates_only_given_fields() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;

    let response = app
        .put("/user", Some(&maria.token), json!({ "user": { "name": "  Maria S.  " } }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["name"], "Maria S.");
    assert_eq!(body["user"]["image"], "https://images.example.com/g-1.png");

    let response = app
        .put("/user", Some(&maria.token), json!({ "user": { "name": " " } }))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = spawn_app().await;
    let response = app.get("/nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
