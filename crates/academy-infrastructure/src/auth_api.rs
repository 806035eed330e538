//! HTTP client for the authentication backend.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use academy_core::auth::{AuthApi, LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use academy_core::config::ApiConfig;
use academy_core::error::{AcademyError, Result};

/// [`AuthApi`] implementation over `reqwest`.
///
/// No retries. The request timeout comes from [`ApiConfig::timeout`] and is
/// disabled when unset.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    login_url: String,
    signup_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AcademyError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            login_url: config.login_url(),
            signup_url: config.signup_url(),
        })
    }

    async fn post<B, R>(&self, url: &str, body: &B, action: &str) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url, "POST {}", action);
        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            warn!(url, error = %e, "{} request failed", action);
            AcademyError::api(None, generic_failure(action))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = error_message(&error_text, action);
            warn!(url, status = status.as_u16(), message = %message, "{} rejected", action);
            return Err(AcademyError::api(Some(status.as_u16()), message));
        }

        response.json::<R>().await.map_err(|e| {
            warn!(url, error = %e, "Failed to parse {} response", action);
            AcademyError::api(Some(status.as_u16()), generic_failure(action))
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self.post(&self.login_url, request, "Login").await?;
        info!(email = %request.email, "Login succeeded");
        Ok(response)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse> {
        let response: SignupResponse = self.post(&self.signup_url, request, "Signup").await?;
        info!(username = %request.username, "Signup succeeded");
        Ok(response)
    }
}

fn generic_failure(action: &str) -> String {
    format!("{} failed, please try again", action)
}

/// Message shown for a rejected request.
///
/// Uses the body's `error` field, else its `detail` field, else the whole
/// JSON body; falls back to a generic message when the body is empty or
/// not JSON.
fn error_message(body: &str, action: &str) -> String {
    fn as_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) | Err(_) => generic_failure(action),
        Ok(value) => value
            .get("error")
            .and_then(as_text)
            .or_else(|| value.get("detail").and_then(as_text))
            .unwrap_or_else(|| value.to_string()),
    }
}
