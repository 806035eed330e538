pub mod auth_api;
pub mod config_service;
pub mod dto;
pub mod paths;
pub mod repository;
pub mod storage;

pub use auth_api::HttpAuthApi;
pub use config_service::ConfigService;
pub use paths::AcademyPaths;
pub use repository::{JsonEntityRepository, JsonProfileRepository, LocalTokenStore};
pub use storage::{LocalStorage, LocalStorageError};
