//! Session token stored as a raw string under the `token` key.

use async_trait::async_trait;

use super::run_blocking;
use crate::storage::LocalStorage;
use academy_core::auth::TokenStore;
use academy_core::error::Result;
use academy_core::store::keys;

#[derive(Debug, Clone)]
pub struct LocalTokenStore {
    storage: LocalStorage,
}

impl LocalTokenStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TokenStore for LocalTokenStore {
    async fn load_token(&self) -> Result<Option<String>> {
        let storage = self.storage.clone();
        run_blocking(move || {
            Ok(storage
                .get_item(keys::TOKEN)?
                .filter(|token| !token.trim().is_empty()))
        })
        .await
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        let storage = self.storage.clone();
        let token = token.to_string();
        run_blocking(move || Ok(storage.set_item(keys::TOKEN, &token)?)).await
    }

    async fn clear_token(&self) -> Result<()> {
        let storage = self.storage.clone();
        run_blocking(move || {
            storage.remove_item(keys::TOKEN)?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalTokenStore::new(LocalStorage::new(temp_dir.path()));

        assert!(store.load_token().await.unwrap().is_none());
        store.save_token("jwt-abc").await.unwrap();
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("jwt-abc"));
        store.clear_token().await.unwrap();
        assert!(store.load_token().await.unwrap().is_none());
    }
}
