use async_trait::async_trait;
use redis::AsyncCommands;

use super::{DraftError, KeyValueStore};

/// Plain GET / SET / DEL against Redis. No expiry: a draft lives until it is
/// cleared or overwritten.
#[derive(Clone)]
pub struct RedisKv {
    client: redis::Client,
}

impl RedisKv {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DraftError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DraftError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
