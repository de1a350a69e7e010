use std::{collections::HashMap, convert::Infallible};

use tokio::sync::RwLock;

use super::KeyValueStore;

/// Process-local store, for tests and for running without a storage dir.
#[derive(Debug, Default)]
pub struct MemoryStore(RwLock<HashMap<String, String>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let guard = self.0.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), Self::Error> {
        let mut guard = self.0.write().await;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let mut guard = self.0.write().await;
        guard.remove(key);
        Ok(())
    }
}
