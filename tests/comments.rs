mod common;

use common::spawn_app;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn comments_are_trimmed_and_listed_with_the_prayer() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let joao = app.sign_in("g-2", "joao@example.com", "Joao").await;
    let prayer = app.create_prayer(&maria.token, "Healing", false).await;
    let id = prayer["id"].as_str().unwrap();

    let response = app.add_comment(&joao.token, id, "   ").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.add_comment(&joao.token, id, "  Praying for you  ").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["comment"]["content"], "Praying for you");
    assert_eq!(body["comment"]["author"]["name"], "Joao");

    app.add_comment(&maria.token, id, "Thank you!").await;

    let body: Value = app
        .get(&format!("/prayers/{}/comments", id), None)
        .await
        .json()
        .await
        .unwrap();
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Praying for you");
    assert_eq!(comments[1]["content"], "Thank you!");

    let body: Value = app.get("/prayers", None).await.json().await.unwrap();
    assert_eq!(body["prayers"][0]["comments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn commenting_requires_sign_in_and_a_prayer() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let prayer = app.create_prayer(&maria.token, "Healing", false).await;
    let id = prayer["id"].as_str().unwrap();

    let response = app
        .post(
            &format!("/prayers/{}/comments", id),
            None,
            Some(json!({ "comment": { "content": "Amen" } })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let missing = uuid::Uuid::new_v4().to_string();
    let response = app.add_comment(&maria.token, &missing, "Amen").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_and_prayer_authors_may_edit() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let joao = app.sign_in("g-2", "joao@example.com", "Joao").await;
    let ana = app.sign_in("g-3", "ana@example.com", "Ana").await;
    let prayer = app.create_prayer(&maria.token, "Healing", false).await;
    let body: Value = app
        .add_comment(&joao.token, prayer["id"].as_str().unwrap(), "Praying")
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/comments/{}", body["comment"]["id"].as_str().unwrap());

    let response = app
        .put(&path, Some(&joao.token), json!({ "comment": { "content": "Praying daily" } }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["comment"]["content"], "Praying daily");

    let response = app
        .put(&path, Some(&maria.token), json!({ "comment": { "content": "Edited by Maria" } }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .put(&path, Some(&ana.token), json!({ "comment": { "content": "Not mine" } }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .put(&path, Some(&joao.token), json!({ "comment": { "content": "  " } }))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let missing = format!("/comments/{}", uuid::Uuid::new_v4());
    let response = app
        .put(&missing, Some(&joao.token), json!({ "comment": { "content": "Hello" } }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_and_prayer_authors_may_delete() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let joao = app.sign_in("g-2", "joao@example.com", "Joao").await;
    let ana = app.sign_in("g-3", "ana@example.com", "Ana").await;
    let prayer = app.create_prayer(&maria.token, "Healing", false).await;
    let prayer_id = prayer["id"].as_str().unwrap();

    let mut paths = Vec::new();
    for content in ["First", "Second"] {
        let body: Value = app
            .add_comment(&joao.token, prayer_id, content)
            .await
            .json()
            .await
            .unwrap();
        paths.push(format!("/comments/{}", body["comment"]["id"].as_str().unwrap()));
    }

    let response = app.delete(&paths[0], Some(&ana.token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.delete(&paths[0], Some(&joao.token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.delete(&paths[1], Some(&maria.token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.delete(&paths[1], Some(&maria.token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = app
        .get(&format!("/prayers/{}/comments", prayer_id), None)
        .await
        .json()
        .await
        .unwrap();
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn comments_of_a_hidden_prayer_follow_the_prayer() {
    let app = spawn_app().await;
    let maria = app.sign_in("g-1", "maria@example.com", "Maria").await;
    let joao = app.sign_in("g-2", "joao@example.com", "Joao").await;
    let prayer = app.create_prayer(&maria.token, "Healing", false).await;
    let id = prayer["id"].as_str().unwrap();

    let response = app.add_comment(&joao.token, id, "Praying for you").await;
    let body: Value = response.json().await.unwrap();
    let joao_comment = body["comment"]["id"].as_str().unwrap().to_string();
    let response = app.add_comment(&joao.token, id, "Still praying").await;
    let body: Value = response.json().await.unwrap();
    let other_comment = body["comment"]["id"].as_str().unwrap().to_string();

    let response = app
        .post(&format!("/prayers/{}/hide", id), Some(&maria.token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let comments_path = format!("/prayers/{}/comments", id);
    let response = app.get(&comments_path, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get(&comments_path, Some(&joao.token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = app
        .get(&comments_path, Some(&maria.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["comments"].as_array().unwrap().len(), 2);

    let response = app
        .put(
            &format!("/comments/{}", joao_comment),
            Some(&joao.token),
            json!({ "comment": { "content": "Edited" } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app
        .delete(&format!("/comments/{}", joao_comment), Some(&joao.token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .delete(&format!("/comments/{}", other_comment), Some(&maria.token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.add_comment(&maria.token, id, "New comment").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
