//! Supabase Auth (GoTrue) client.
//!
//! - token sign-in: `GET /auth/v1/user` with the token as bearer
//! - anonymous sign-in: `POST /auth/v1/signup` with an empty body

use crate::{AuthBackend, AuthError, AuthResult, Identity};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    is_anonymous: bool,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    access_token: Option<String>,
    user: Option<UserResponse>,
}

/// Supabase Auth client.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    http_client: reqwest::Client,
    api_url: String,
    publishable_key: String,
}

impl SupabaseAuthClient {
    /// Create a new client for a project URL such as `https://xyz.supabase.co`.
    pub fn new(api_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            publishable_key: publishable_key.into(),
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.api_url, endpoint)
    }

    async fn check_response(response: reqwest::Response) -> AuthResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let message = response.text().await.unwrap_or_default();
        error!(status = code, "Supabase auth request failed");
        if matches!(code, 400 | 401 | 403 | 422) {
            Err(AuthError::Rejected {
                status: code,
                message,
            })
        } else {
            Err(AuthError::Backend {
                status: code,
                message,
            })
        }
    }
}

#[async_trait]
impl AuthBackend for SupabaseAuthClient {
    async fn sign_in_with_token(&self, token: &str) -> AuthResult<Identity> {
        debug!("Verifying supplied token with Supabase");

        let response = self
            .http_client
            .get(self.auth_url("user"))
            .header("apikey", &self.publishable_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let user: UserResponse = Self::check_response(response).await?.json().await?;
        if user.id.is_empty() {
            return Err(AuthError::MalformedResponse("empty user id".to_string()));
        }

        Ok(Identity::new(user.id, Some(token.to_string()), user.is_anonymous))
    }

    async fn sign_in_anonymously(&self) -> AuthResult<Identity> {
        debug!("Requesting anonymous sign-up from Supabase");

        let response = self
            .http_client
            .post(self.auth_url("signup"))
            .header("apikey", &self.publishable_key)
            .header("Authorization", format!("Bearer {}", self.publishable_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let signup: SignupResponse = Self::check_response(response).await?.json().await?;
        let user = signup
            .user
            .filter(|user| !user.id.is_empty())
            .ok_or_else(|| AuthError::MalformedResponse("signup returned no user".to_string()))?;

        Ok(Identity::new(user.id, signup.access_token, true))
    }
}

impl std::fmt::Debug for SupabaseAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseAuthClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn token_sign_in_returns_token_owner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer user-token"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-123",
                "email": "someone@example.com"
            })))
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let identity = client.sign_in_with_token("user-token").await.unwrap();

        assert_eq!(identity.user_id.as_str(), "user-123");
        assert_eq!(identity.access_token.as_deref(), Some("user-token"));
        assert!(!identity.anonymous);
    }

    #[tokio::test]
    async fn rejected_token_maps_to_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid JWT"))
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let err = client.sign_in_with_token("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn anonymous_sign_up_returns_anonymous_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "anon-access",
                "user": { "id": "anon-1", "is_anonymous": true }
            })))
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(format!("{}/", server.uri()), "anon-key");
        let identity = client.sign_in_anonymously().await.unwrap();

        assert_eq!(identity.user_id.as_str(), "anon-1");
        assert_eq!(identity.access_token.as_deref(), Some("anon-access"));
        assert!(identity.anonymous);
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SupabaseAuthClient::new(server.uri(), "anon-key");
        let err = client.sign_in_anonymously().await.unwrap_err();
        assert!(err.is_transient());
    }
}
