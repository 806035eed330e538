pub mod auth;
pub mod config;
pub mod entity;
pub mod error;
pub mod profile;
pub mod store;
pub mod validation;

// Re-export common error type
pub use error::{AcademyError, Result};
