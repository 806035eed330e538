//! Repository implementations backed by [`LocalStorage`](crate::storage::LocalStorage).

mod entity;
mod profile;
mod token;

pub use entity::JsonEntityRepository;
pub use profile::JsonProfileRepository;
pub use token::LocalTokenStore;

use academy_core::error::{AcademyError, Result};

/// Runs blocking storage I/O off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AcademyError::internal(format!("Failed to join task: {}", e)))?
}
