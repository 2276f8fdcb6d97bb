//! Session/config service client.
//!
//! The shell consumes three resources from the registry API: the current
//! user (whose pending prompts drive the onboarding gate), the registry
//! configuration (display title), and a CSRF token for subsequent
//! mutating calls. Non-2xx responses and transport failures surface as
//! error values; the shell renders them, it never retries automatically.
//!
//! Requests attach the bearer token from shared auth state when it has
//! already resolved. Requests sent before the host token fetch settles
//! simply go out unauthenticated.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::state::ShellState;

/// The signed-in user as returned by `GET /api/v1/user/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    /// Pending first-run prompts, e.g. `"confirm_username"`.
    #[serde(default)]
    pub prompts: Vec<String>,
}

/// Registry configuration as returned by `GET /config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub config: RegistryConfigFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfigFields {
    #[serde(rename = "REGISTRY_TITLE", default)]
    pub registry_title: String,
}

#[derive(Debug, Deserialize)]
struct CsrfTokenResponse {
    csrf_token: String,
}

pub struct SessionClient {
    base: Url,
    client: reqwest::Client,
    state: Arc<ShellState>,
}

impl SessionClient {
    /// Build a client bound to the session's base origin. The request
    /// timeout comes from shell config.
    pub fn new(base: Url, state: Arc<ShellState>) -> Result<Self, String> {
        let timeout_secs = state.config.read().request_timeout_secs;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            base,
            client,
            state,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = self
            .base
            .join(path)
            .map_err(|e| format!("Invalid API path \"{path}\": {e}"))?;

        let mut request = self.client.get(url.clone());
        if let Some(token) = self.state.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Request to {url} failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("{url} returned HTTP {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response from {url}: {e}"))
    }

    pub async fn fetch_current_user(&self) -> Result<CurrentUser, String> {
        self.get_json("/api/v1/user/").await
    }

    pub async fn fetch_registry_config(&self) -> Result<RegistryConfig, String> {
        self.get_json("/config").await
    }

    pub async fn fetch_csrf_token(&self) -> Result<String, String> {
        let response: CsrfTokenResponse = self.get_json("/csrf_token").await?;
        Ok(response.csrf_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;

    fn client_for(server: &mockito::ServerGuard) -> SessionClient {
        let state = Arc::new(ShellState::new(ShellConfig::default()));
        let base = Url::parse(&server.url()).unwrap();
        SessionClient::new(base, state).unwrap()
    }

    #[tokio::test]
    async fn fetches_current_user_with_prompts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"username": "alice", "prompts": ["confirm_username"]}"#)
            .create_async()
            .await;

        let user = client_for(&server).fetch_current_user().await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.prompts, vec!["confirm_username".to_string()]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_prompts_defaults_to_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body(r#"{"username": "bob"}"#)
            .create_async()
            .await;

        let user = client_for(&server).fetch_current_user().await.unwrap();
        assert!(user.prompts.is_empty());
    }

    #[tokio::test]
    async fn non_2xx_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/user/")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server).fetch_current_user().await.unwrap_err();
        assert!(err.contains("HTTP 500"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn malformed_body_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server).fetch_current_user().await.unwrap_err();
        assert!(err.contains("parse"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn bearer_token_attached_once_resolved() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/user/")
            .match_header("authorization", "Bearer host-token")
            .with_status(200)
            .with_body(r#"{"username": "alice"}"#)
            .create_async()
            .await;

        let state = Arc::new(ShellState::new(ShellConfig::default()));
        state.set_bearer_token("host-token".to_string());
        let base = Url::parse(&server.url()).unwrap();
        let client = SessionClient::new(base, state).unwrap();

        client.fetch_current_user().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_authorization_header_before_token_resolves() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/user/")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"username": "alice"}"#)
            .create_async()
            .await;

        client_for(&server).fetch_current_user().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetches_registry_title() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/config")
            .with_status(200)
            .with_body(r#"{"config": {"REGISTRY_TITLE": "Acme Registry"}}"#)
            .create_async()
            .await;

        let config = client_for(&server).fetch_registry_config().await.unwrap();
        assert_eq!(config.config.registry_title, "Acme Registry");
    }

    #[tokio::test]
    async fn fetches_csrf_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/csrf_token")
            .with_status(200)
            .with_body(r#"{"csrf_token": "csrf-abc"}"#)
            .create_async()
            .await;

        let token = client_for(&server).fetch_csrf_token().await.unwrap();
        assert_eq!(token, "csrf-abc");
    }
}
