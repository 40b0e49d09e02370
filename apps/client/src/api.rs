//! HTTP client for the auth/roadmap backend and the roadmap-generation service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::UserProfile;

/// Header both services read the bearer token from.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

const API_TIMEOUT: Duration = Duration::from_secs(10);
/// Roadmap generation takes ~15s; leave generous headroom.
const AI_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    msg: String,
}

/// The slice of the backend the login flow depends on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    api: Client,
    ai: Client,
    api_url: String,
    ai_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            api: Client::builder().timeout(API_TIMEOUT).build()?,
            ai: Client::builder().timeout(AI_TIMEOUT).build()?,
            api_url: config.api_url.clone(),
            ai_url: config.ai_url.clone(),
        })
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .api
            .post(format!("{}/api/auth/register", self.api_url))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await?;
        parse_response(response).await
    }

    /// Current profile of the token's owner.
    pub async fn me(&self, token: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .api
            .get(format!("{}/api/auth/me", self.api_url))
            .header(AUTH_TOKEN_HEADER, token)
            .send()
            .await?;
        parse_response(response).await
    }

    /// Marks a task done or pending; returns the full completed-task list.
    pub async fn toggle_task(
        &self,
        user_id: &str,
        week_index: i64,
        task_index: i64,
        completed: bool,
    ) -> Result<Vec<String>, ClientError> {
        let response = self
            .api
            .put(format!("{}/api/auth/update-task", self.api_url))
            .json(&json!({
                "userId": user_id,
                "weekIndex": week_index,
                "taskIndex": task_index,
                "completed": completed,
            }))
            .send()
            .await?;
        parse_response(response).await
    }

    /// Persists a generated roadmap on the backend. The previous roadmap and
    /// its progress are replaced; returns the updated profile.
    pub async fn save_roadmap(
        &self,
        token: &str,
        payload: &Map<String, Value>,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .api
            .put(format!("{}/api/auth/roadmap", self.api_url))
            .header(AUTH_TOKEN_HEADER, token)
            .json(payload)
            .send()
            .await?;
        parse_response(response).await
    }

    /// Uploads a résumé to the generation service and returns the user-shaped
    /// payload (roadmap, analysis, targetRole) to merge into the session.
    pub async fn generate_roadmap(
        &self,
        resume: &Path,
        role: &str,
        token: Option<&str>,
    ) -> Result<Map<String, Value>, ClientError> {
        let bytes = tokio::fs::read(resume).await?;
        let file_name = resume
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        info!("Uploading {} ({} bytes) for role '{role}'", file_name, bytes.len());

        let form = Form::new()
            .part("resume", Part::bytes(bytes).file_name(file_name))
            .text("role", role.to_string());

        let mut request = self
            .ai
            .post(format!("{}/api/ai/generate", self.ai_url))
            .multipart(form);
        if let Some(token) = token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }

        parse_response(request.send().await?).await
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .api
            .post(format!("{}/api/auth/login", self.api_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        parse_response(response).await
    }
}

/// Decodes a 2xx body as `T`; anything else becomes `ClientError::Api`.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Request failed with {status}: {body}");
    Err(ClientError::Api {
        status: status.as_u16(),
        msg: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.msg)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers one HTTP request with `status` and a JSON `body`; the handle
    /// resolves to the raw request it received.
    async fn serve_once(status: &'static str, body: String) -> (ClientConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        let config = ClientConfig {
            api_url: url.clone(),
            ai_url: url,
            demo_mode: false,
        };
        (config, handle)
    }

    #[tokio::test]
    async fn test_save_roadmap_puts_payload_with_token() {
        let profile = json!({
            "id": "7",
            "username": "alice",
            "email": "a@x.com",
            "targetRole": "SRE",
            "roadmap": [{"week": 1, "title": "Linux", "tasks": ["Read man pages"]}],
            "analysis": {"current_level": "Junior"},
            "completedTasks": [],
            "createdAt": "2026-01-01T00:00:00Z"
        });
        let (config, server) = serve_once("200 OK", profile.to_string()).await;
        let client = ApiClient::new(&config).unwrap();

        let payload = json!({
            "targetRole": "SRE",
            "analysis": {"current_level": "Junior"},
            "roadmap": [{"week": 1, "title": "Linux", "tasks": ["Read man pages"]}]
        });
        let saved = client
            .save_roadmap("jwt-1", payload.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(saved.target_role.as_deref(), Some("SRE"));
        assert_eq!(saved.task_count(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/auth/roadmap "));
        assert!(request.to_lowercase().contains("x-auth-token: jwt-1"));
        assert!(request.contains(r#""current_level":"Junior""#));
    }

    #[tokio::test]
    async fn test_save_roadmap_surfaces_rejection() {
        let (config, server) = serve_once(
            "401 Unauthorized",
            r#"{"msg": "Token is not valid"}"#.to_string(),
        )
        .await;
        let client = ApiClient::new(&config).unwrap();

        let err = client.save_roadmap("stale", &Map::new()).await.unwrap_err();
        match err {
            ClientError::Api { status, msg } => {
                assert_eq!(status, 401);
                assert_eq!(msg, "Token is not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[test]
    fn test_error_message_from_msg_body() {
        assert_eq!(
            error_message(r#"{"msg": "Invalid Credentials"}"#),
            "Invalid Credentials"
        );
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Server error\n"), "Server error");
    }

    #[test]
    fn test_auth_response_decodes_register_snapshot() {
        let body = r#"{"token": "abc", "user": {"id": "7", "username": "alice", "email": "a@x.com", "roadmap": []}}"#;
        let response: AuthResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.user.username, "alice");
        assert!(response.user.completed_tasks.is_empty());
    }
}
