//! Backend and token storage seams of the authentication flow.

use async_trait::async_trait;

use super::model::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use crate::error::Result;

/// Remote authentication backend.
///
/// Failures are reported as `AcademyError::Api` whose message is ready to be
/// shown to the user.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/login/`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// `POST /signup/`
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse>;
}

/// Persistence of the opaque session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load_token(&self) -> Result<Option<String>>;

    async fn save_token(&self, token: &str) -> Result<()>;

    async fn clear_token(&self) -> Result<()>;
}
