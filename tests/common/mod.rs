use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use pwreset::config::Config;
use pwreset::email::Notifier;
use pwreset::models::{PasswordToken, User};
use pwreset::store::memory::MemoryStore;

/// Notifier that records each dispatch instead of sending mail.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, token: &PasswordToken) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), token.token.clone()));
        Ok(())
    }
}

/// A running test server instance backed by an in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn seed_user(&self, email: &str, username: &str) -> User {
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            username: username.to_string(),
            password: "original".to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_user(user.clone());
        user
    }

    /// All `(recipient, token)` pairs handed to the notifier so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.notifier.sent.lock().unwrap().clone()
    }

    /// The token string from the only dispatched notification.
    pub fn single_sent_token(&self) -> String {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one notification");
        sent[0].1.clone()
    }

    /// `POST /forgot-password/`, returning (body, status).
    pub async fn request_reset(&self, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/forgot-password/"))
            .json(body)
            .send()
            .await
            .expect("request reset failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (body, status)
    }

    /// `GET /forgot-password/{token}`, returning (body, status).
    pub async fn validate(&self, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(&format!("/forgot-password/{token}")))
            .send()
            .await
            .expect("validate failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (body, status)
    }

    /// `POST /forgot-password/{token}`, returning (body, status).
    pub async fn consume(&self, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/forgot-password/{token}")))
            .json(body)
            .send()
            .await
            .expect("consume failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (body, status)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app on a random port, with a config tweak applied first.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let mut config = Config {
        database_url: String::new(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        base_url: "http://localhost:0".to_string(),
        authorized_fields: vec!["email".to_string()],
        default_ttl: Duration::days(1),
        replace_existing: false,
        default_provider: "email".to_string(),
        log_level: "warn".to_string(),
        smtp: None,
    };
    configure(&mut config);

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier {
        sent: Mutex::new(Vec::new()),
    });

    let app = pwreset::build_app(store.clone(), notifier.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        store,
        notifier,
        client,
    }
}
