// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use journal_backend::{
    config::Config,
    db,
    error::AppError,
    models::magic_token::MagicToken,
    routes,
    state::AppState,
    utils::mailer::Mailer,
};
use serde_json::Value;

/// Keeps every delivered token so tests can finish the login flow.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_token_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == recipient)
            .map(|(_, token)| token.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_magic_token(&self, recipient: &str, token: &MagicToken) -> Result<(), AppError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), token.id.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub mailer: Arc<RecordingMailer>,
}

/// Spawns the app on a random port over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // 1. Create a pool and run migrations
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::migrate(&pool).await.expect("Failed to migrate database");

    // 2. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        magic_token_ttl_minutes: 3,
        token_sweep_interval_secs: 180,
    };
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState {
        pool,
        config,
        mailer: mailer.clone(),
    };

    // 3. Bind to port 0 to get a random available port
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        mailer,
    }
}

pub fn unique_username() -> String {
    format!("u{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "first_name": "Test",
                "last_name": "User",
                "username": username,
                "email": format!("{username}@example.com"),
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn request_token(&self, identifier: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "identifier": identifier }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn verify(&self, token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/verify"))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers `username` and walks the magic-token flow; returns the bearer token.
    pub async fn login(&self, username: &str) -> String {
        assert_eq!(self.register(username).await.status().as_u16(), 201);
        assert_eq!(self.request_token(username).await.status().as_u16(), 202);

        let magic = self
            .mailer
            .last_token_for(&format!("{username}@example.com"))
            .expect("token was mailed");
        let body: Value = self.verify(&magic).await.json().await.unwrap();
        body["token"].as_str().expect("session token").to_string()
    }

    pub async fn create_post(&self, jwt: &str, title: &str) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/posts"))
            .bearer_auth(jwt)
            .json(&serde_json::json!({ "title": title, "content": "C" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
        resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}
