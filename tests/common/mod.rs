#![allow(dead_code)]

use std::{net::Ipv4Addr, path::PathBuf, time::Duration};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use prayerwall::{get_random_free_port, make_router, run_app, Config};
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

pub const IDENTITY_PROVIDER_SECRET: &str = "test-identity-provider-secret";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub config: Config,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub struct SignedIn {
    pub id: String,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    let (port, _) = get_random_free_port();
    let db_path = std::env::temp_dir().join(format!("prayerwall-test-{}.db", Uuid::new_v4()));
    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        host: Ipv4Addr::LOCALHOST.into(),
        port,
        jwt_secret: "test-jwt-secret".to_string(),
        identity_provider_secret: IDENTITY_PROVIDER_SECRET.to_string(),
        token_issuer: "prayerwall-test".to_string(),
        token_ttl: time::Duration::hours(1),
    };
    tokio::spawn(run_app(make_router(), config.clone()));

    let app = TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        config,
        db_path,
    };
    for _ in 0..100 {
        if let Ok(response) = app.client.get(app.url("/check_health")).send().await {
            if response.status().is_success() {
                return app;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not start");
}

pub fn sign_assertion(secret: &str, claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn assertion_claims(sub: &str, email: Option<&str>, name: Option<&str>) -> Value {
    json!({
        "sub": sub,
        "provider": "google",
        "email": email,
        "name": name,
        "picture": format!("https://images.example.com/{}.png", sub),
        "exp": time::OffsetDateTime::now_utc().unix_timestamp() + 300,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        request.send().await.unwrap()
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Option<Value>) -> Response {
        self.request(Method::POST, path, token, body).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Response {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response {
        self.request(Method::DELETE, path, token, None).await
    }

    pub async fn session(&self, claims: Value) -> Response {
        let assertion = sign_assertion(IDENTITY_PROVIDER_SECRET, claims);
        self.post("/auth/session", None, Some(json!({ "assertion": assertion })))
            .await
    }

    pub async fn sign_in(&self, sub: &str, email: &str, name: &str) -> SignedIn {
        let response = self
            .session(assertion_claims(sub, Some(email), Some(name)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        SignedIn {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            token: body["user"]["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_prayer(&self, token: &str, title: &str, anonymous: bool) -> Value {
        let response = self
            .post(
                "/prayers",
                Some(token),
                Some(json!({
                    "prayer": {
                        "title": title,
                        "content": "Please pray for my family this week",
                        "isAnonymous": anonymous,
                    }
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        body["prayer"].clone()
    }

    pub async fn add_comment(&self, token: &str, prayer_id: &str, content: &str) -> Response {
        self.post(
            &format!("/prayers/{}/comments", prayer_id),
            Some(token),
            Some(json!({ "comment": { "content": content } })),
        )
        .await
    }
}

pub async fn error_message(response: Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["errors"]["body"][0].as_str().unwrap().to_string()
}
