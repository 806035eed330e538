use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::{DEFAULT_ROLE, Profile, RawUserData};
use crate::validation::{FieldError, FormErrors};

/// Values typed into the login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FormErrors::new();
        errors.required_email("email", &self.email);
        errors.require("password", &self.password, "Password");
        errors.finish()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Values typed into the signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub club: String,
    pub phone: String,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role: DEFAULT_ROLE.to_string(),
            club: String::new(),
            phone: String::new(),
        }
    }
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FormErrors::new();
        errors.require("username", &self.username, "Username");
        errors.required_email("email", &self.email);
        errors.require("password", &self.password, "Password");
        errors.passwords_match(&self.password, &self.confirm_password);
        errors.optional_phone("phone", &self.phone);
        errors.finish()
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: self.role.trim().to_string(),
            club: self.club.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    /// The form values as the transformer's secondary source.
    pub fn to_user_data(&self) -> RawUserData {
        fn non_empty(s: &str) -> Option<String> {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }

        RawUserData {
            username: non_empty(&self.username),
            email: non_empty(&self.email),
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            phone: non_empty(&self.phone),
            role: non_empty(&self.role),
            club: non_empty(&self.club),
            ..Default::default()
        }
    }
}

/// Body of `POST /api/login/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /signup/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub club: String,
    pub phone: String,
}

/// Successful login reply. `user` is untyped: the backend may send either a
/// raw user record or an already normalized profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Value>,
}

/// Successful signup reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

/// The signed-in user as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: Option<String>,
    pub profile: Profile,
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
