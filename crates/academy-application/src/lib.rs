//! Application layer for Academy Portal.
//!
//! Use cases that coordinate the core domain with the storage and HTTP
//! adapters: authentication, profile settings and roster management.

pub mod app;
pub mod auth_usecase;
pub mod logging;
pub mod profile_service;
pub mod roster_service;

pub use app::AcademyApp;
pub use auth_usecase::AuthUseCase;
pub use logging::{LoggingGuard, init_logging};
pub use profile_service::ProfileService;
pub use roster_service::{PlayerFilter, RosterService};
