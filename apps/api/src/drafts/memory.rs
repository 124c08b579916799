use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DraftError, KeyValueStore};

/// In-process store backing the tests.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DraftError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DraftError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
