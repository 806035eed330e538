//! Storage layer: the directory-backed key/value store.

mod local_storage;

pub use local_storage::{LocalStorage, LocalStorageError};
