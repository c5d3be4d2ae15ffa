use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;

use wenet_profile_manager::config::ServerConfig;
use wenet_profile_manager::server::{build_repository, build_router, AppState};

/// A profile manager listening on a random local port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_seeded() -> Self {
        let config = ServerConfig {
            seed_file: Some(fixture("profiles.json")),
            ..Default::default()
        };
        Self::start_with(config).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let repository = build_repository(&config)
            .await
            .expect("store should initialize");
        let app = build_router(AppState::new(repository, config));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral port should be available");
        let address = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });

        TestServer {
            base_url: format!("http://{}", address),
            client: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        read(self.client.get(self.url(path)).send().await.unwrap()).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        read(self.client.post(self.url(path)).json(body).send().await.unwrap()).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        read(self.client.put(self.url(path)).json(body).send().await.unwrap()).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        read(self.client.patch(self.url(path)).json(body).send().await.unwrap()).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        read(self.client.delete(self.url(path)).send().await.unwrap()).await
    }

    /// Create a profile and return its identifier.
    pub async fn create(&self, body: &Value) -> String {
        let (status, created) = self.post("/profiles", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
        created["id"].as_str().unwrap().to_string()
    }
}

async fn read(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}
