//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: Login/signup forms, wire requests and responses, session
//! - `api`: Backend client and token storage traits

mod api;
mod model;

pub use api::{AuthApi, TokenStore};
pub use model::{
    AuthSession, LoginForm, LoginRequest, LoginResponse, SignupForm, SignupRequest, SignupResponse,
};
