//! Client for the training backend.
//!
//! Saves architectures, manages training sessions and creates share links. Calls are plain
//! request/response: no retries, no backoff. Any status other than the expected one
//! surfaces as [`ServerError::UnexpectedStatus`].

use crate::constants::{API_URL_ENV, DEFAULT_API_URL};
use crate::store::Architecture;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Identifier of a saved architecture on the server.
pub type ModelId = i64;

/// Identifier of a training session on the server.
pub type SessionId = i64;

/// Failures reported by [`ServerClient`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// The server answered, but not with the expected status
    #[error("unexpected status {actual} (expected {expected})")]
    UnexpectedStatus {
        /// Status the call requires
        expected: StatusCode,
        /// Status the server returned
        actual: StatusCode,
    },
    /// The request never completed or the body could not be decoded
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response decoded but lacks a field the caller needs
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

/// Result type for server calls.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL every resource path is appended to; always ends with `/`
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ServerConfig {
    /// Creates a config for `base_url`, adding the trailing slash if missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Reads the base URL from `LAYER_CANVAS_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}{}", self.base_url, resource)
    }
}

/// Extracts the ID of a created resource from `{"data": {"id": ..}}` or `{"id": ..}`.
pub fn resource_id(value: &Value) -> Option<i64> {
    value
        .get("data")
        .and_then(|data| data.get("id"))
        .or_else(|| value.get("id"))
        .and_then(Value::as_i64)
}

/// Async HTTP client for the backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    config: ServerConfig,
}

impl ServerClient {
    /// Creates a client for the given backend.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Backend this client talks to.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Stores an architecture. Requires `201 Created`.
    pub async fn save_model(&self, architecture: &Architecture) -> Result<Value> {
        let response = self
            .http
            .post(self.config.endpoint("Architecture"))
            .header(ACCEPT, "application/json")
            .json(architecture)
            .send()
            .await?;
        decode(response, StatusCode::CREATED).await
    }

    /// Opens a training session for a saved architecture. Requires `201 Created`.
    pub async fn start_session(&self, model_id: ModelId) -> Result<Value> {
        let response = self
            .http
            .post(self.config.endpoint("Train"))
            .header(ACCEPT, "application/json")
            .json(&json!({ "id": model_id }))
            .send()
            .await?;
        decode(response, StatusCode::CREATED).await
    }

    /// Fetches the current state of a training session. Requires `200 OK`.
    pub async fn update_train(&self, session_id: SessionId) -> Result<Value> {
        let response = self
            .http
            .get(self.config.endpoint("Train"))
            .query(&[("id", session_id)])
            .send()
            .await?;
        decode(response, StatusCode::OK).await
    }

    /// Stops a training session and returns the acknowledgement status.
    pub async fn delete_train(&self, session_id: SessionId) -> Result<StatusCode> {
        let response = self
            .http
            .delete(self.config.endpoint("Train"))
            .json(&json!({ "id": session_id }))
            .send()
            .await?;
        Ok(response.status())
    }

    /// Creates a share link for a saved architecture. Requires `201 Created`.
    pub async fn create_link(&self, model_id: ModelId) -> Result<String> {
        let response = self
            .http
            .post(self.config.endpoint("Link"))
            .header(ACCEPT, "application/json")
            .json(&json!({ "modelID": model_id }))
            .send()
            .await?;
        let body = decode(response, StatusCode::CREATED).await?;
        body.get("data")
            .and_then(|data| data.get("link"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(ServerError::MissingField("data.link"))
    }
}

async fn decode(response: reqwest::Response, expected: StatusCode) -> Result<Value> {
    let actual = response.status();
    if actual != expected {
        log::warn!("{} answered {actual}, expected {expected}", response.url());
        return Err(ServerError::UnexpectedStatus { expected, actual });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use std::io::Read;
    use std::thread::JoinHandle;

    /// What the fake backend saw.
    #[derive(Debug)]
    struct Seen {
        method: String,
        url: String,
        body: String,
    }

    /// Starts a backend that answers exactly one request with `status` and `body`.
    fn serve_once(status: u16, body: &'static str) -> (ServerClient, JoinHandle<Seen>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();
            let seen = Seen {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body: received,
            };
            request
                .respond(
                    tiny_http::Response::from_string(body)
                        .with_status_code(tiny_http::StatusCode(status)),
                )
                .unwrap();
            seen
        });
        let client = ServerClient::new(ServerConfig::new(format!("http://{addr}/api")));
        (client, handle)
    }

    #[test]
    fn config_enforces_trailing_slash() {
        assert_eq!(
            ServerConfig::new("http://host/api").base_url,
            "http://host/api/"
        );
        assert_eq!(ServerConfig::default().base_url, DEFAULT_API_URL);
    }

    #[test]
    fn resource_id_reads_nested_or_flat_ids() {
        assert_eq!(resource_id(&json!({"data": {"id": 4}})), Some(4));
        assert_eq!(resource_id(&json!({"id": 9})), Some(9));
        assert_eq!(resource_id(&json!({"status": "ok"})), None);
    }

    #[tokio::test]
    async fn save_model_posts_architecture() {
        let (client, backend) = serve_once(201, r#"{"status": "success!", "data": {"id": 12}}"#);
        let mut architecture = Architecture::new();
        architecture
            .add_node(LayerKind::Dense, eframe::egui::pos2(50.0, 50.0))
            .unwrap();

        let created = client.save_model(&architecture).await.unwrap();

        assert_eq!(resource_id(&created), Some(12));
        let seen = backend.join().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.url, "/api/Architecture");
        let sent: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(sent["models"]["2"]["type"], "dense");
    }

    #[tokio::test]
    async fn save_model_rejects_server_error() {
        let (client, backend) = serve_once(500, r#"{"message": "boom"}"#);

        let err = client.save_model(&Architecture::new()).await.unwrap_err();

        match err {
            ServerError::UnexpectedStatus { expected, actual } => {
                assert_eq!(expected, StatusCode::CREATED);
                assert_eq!(actual, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected unexpected-status failure, got {other:?}"),
        }
        backend.join().unwrap();
    }

    #[tokio::test]
    async fn start_session_requires_created() {
        let (client, backend) = serve_once(200, r#"{"id": 1}"#);

        let err = client.start_session(3).await.unwrap_err();

        assert!(matches!(err, ServerError::UnexpectedStatus { .. }));
        let seen = backend.join().unwrap();
        assert_eq!(seen.url, "/api/Train");
        assert_eq!(serde_json::from_str::<Value>(&seen.body).unwrap(), json!({"id": 3}));
    }

    #[tokio::test]
    async fn update_train_queries_session() {
        let (client, backend) = serve_once(200, r#"{"epoch": 2, "loss": 0.25}"#);

        let state = client.update_train(7).await.unwrap();

        assert_eq!(state["epoch"], 2);
        let seen = backend.join().unwrap();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.url, "/api/Train?id=7");
    }

    #[tokio::test]
    async fn update_train_fails_when_not_found() {
        let (client, backend) = serve_once(404, r#"{"message": "no session"}"#);

        let err = client.update_train(7).await.unwrap_err();

        match err {
            ServerError::UnexpectedStatus { actual, .. } => {
                assert_eq!(actual, StatusCode::NOT_FOUND)
            }
            other => panic!("expected unexpected-status failure, got {other:?}"),
        }
        backend.join().unwrap();
    }

    #[tokio::test]
    async fn delete_train_returns_acknowledgement() {
        let (client, backend) = serve_once(204, "");

        let status = client.delete_train(5).await.unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let seen = backend.join().unwrap();
        assert_eq!(seen.method, "DELETE");
        assert_eq!(serde_json::from_str::<Value>(&seen.body).unwrap(), json!({"id": 5}));
    }

    #[tokio::test]
    async fn create_link_returns_generated_link() {
        let (client, backend) =
            serve_once(201, r#"{"status": "success!", "data": {"link": "abc123", "modelID": 4}}"#);

        let link = client.create_link(4).await.unwrap();

        assert_eq!(link, "abc123");
        let seen = backend.join().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&seen.body).unwrap(),
            json!({"modelID": 4})
        );
    }

    #[tokio::test]
    async fn create_link_without_link_field_is_missing_field() {
        let (client, backend) = serve_once(201, r#"{"status": "success!", "data": {}}"#);

        let err = client.create_link(4).await.unwrap_err();

        assert!(matches!(err, ServerError::MissingField("data.link")));
        backend.join().unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ServerClient::new(ServerConfig::new(format!("http://127.0.0.1:{port}/api/")));

        let err = client.update_train(1).await.unwrap_err();

        assert!(matches!(err, ServerError::Transport(_)));
    }
}
