//! Shared harness for sadhana-service integration tests.
//!
//! Spawns the real axum application on a random port, backed by the
//! in-memory stores, and talks to it over HTTP with reqwest.

#![allow(dead_code)]

use std::sync::Arc;

use sadhana_service::config::{JwtConfig, MongoConfig, SadhanaConfig};
use sadhana_service::models::{Role, User};
use sadhana_service::services::{MemoryStore, ReportStore, Stores, UserStore};
use sadhana_service::startup::Application;
use sadhana_service::utils::{hash_password, Password};
use serde_json::{json, Value};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub users: Arc<MemoryStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let stores = Stores {
            users: store.clone() as Arc<dyn UserStore>,
            reports: store.clone() as Arc<dyn ReportStore>,
        };

        let config = SadhanaConfig {
            common: test_common_config(),
            mongodb: MongoConfig {
                uri: "mongodb://unused".to_string(),
                database: "unused".to_string(),
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                expiry_minutes: 60,
            },
        };

        let app = Application::build(config, stores)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(app.run_until_stopped());

        TestApp {
            address,
            client: reqwest::Client::new(),
            users: store,
        }
    }

    /// Insert an account directly into the store, bypassing the public
    /// register route (which only produces `user` accounts).
    pub async fn seed_user(&self, name: &str, email: &str, role: Role, counselor: Option<&str>) -> User {
        let hash = hash_password(&Password::new("pw123456".to_string()))
            .expect("Failed to hash password");
        let user = User::new(
            name.to_string(),
            email.to_string(),
            hash.into_string(),
            role,
            counselor.map(str::to_string),
        );
        UserStore::insert(self.users.as_ref(), &user)
            .await
            .expect("Failed to seed user");
        user
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/auth/register", self.address))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/auth/login", self.address))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Seed an account and return a token for it.
    pub async fn seed_and_login(&self, name: &str, email: &str, role: Role, counselor: Option<&str>) -> (User, String) {
        let user = self.seed_user(name, email, role, counselor).await;
        let token = self.login_token(email, "pw123456").await;
        (user, token)
    }

    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Login response was not JSON");
        body["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Submit a report for the token's account with sensible defaults.
    pub async fn submit_report(&self, token: &str, date: &str) -> reqwest::Response {
        self.post_json(
            "/sadhana",
            token,
            &json!({
                "date": date,
                "wakeup_time": "04:30",
                "bed_time": "21:30",
                "chanting_rounds": 16,
                "book_reading_minutes": 30,
                "deity_prayer": "Yes",
                "lecture_by": ["HG Prabhu"],
                "hearing_minutes": 45,
                "individual_vows": "no coffee"
            }),
        )
        .await
    }
}

fn test_common_config() -> service_core::config::Config {
    // Port 0 makes the OS pick a free port for each TestApp.
    service_core::config::Config {
        port: 0,
        environment: service_core::config::Environment::Dev,
    }
}
