//! Draft persistence. One well-known key per session holds the whole wizard
//! draft as JSON; a second key mirrors only the resume metadata. Writes are
//! full overwrites. Callers that read, modify and write back a draft hold the
//! session's lock from [`DraftStore::lock`] for the whole cycle.

pub mod locks;
#[cfg(test)]
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::application::{ApplicationRecord, ResumeMeta};
use crate::uploads::UploadStatus;
use crate::wizard::steps::FIRST_STEP;
use crate::wizard::validation::FieldErrors;

#[cfg(test)]
pub use memory::MemoryKv;
pub use locks::{SessionGuard, SessionLocks};
pub use redis_store::RedisKv;

const DRAFT_KEY_PREFIX: &str = "jobform:draft";
const RESUME_META_KEY_PREFIX: &str = "jobform:resume_meta";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything needed to put a wizard back where it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub step: u8,
    pub record: ApplicationRecord,
    pub errors: FieldErrors,
    pub upload: UploadStatus,
    pub progress: u8,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            step: FIRST_STEP,
            record: ApplicationRecord::default(),
            errors: FieldErrors::default(),
            upload: UploadStatus::Idle,
            progress: 0,
        }
    }
}

/// Raw string storage behind the draft store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DraftError>;
    async fn set(&self, key: &str, value: String) -> Result<(), DraftError>;
    async fn delete(&self, key: &str) -> Result<(), DraftError>;
}

pub fn draft_key(session: Uuid) -> String {
    format!("{DRAFT_KEY_PREFIX}:{session}")
}

pub fn resume_meta_key(session: Uuid) -> String {
    format!("{RESUME_META_KEY_PREFIX}:{session}")
}

#[derive(Clone)]
pub struct DraftStore {
    kv: Arc<dyn KeyValueStore>,
    locks: SessionLocks,
}

impl DraftStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            locks: SessionLocks::default(),
        }
    }

    /// Waits until no other read-modify-write cycle of `session` is running.
    pub async fn lock(&self, session: Uuid) -> SessionGuard {
        self.locks.acquire(session).await
    }

    pub async fn save(&self, session: Uuid, draft: &Draft) -> Result<(), DraftError> {
        let json = serde_json::to_string(draft)?;
        self.kv.set(&draft_key(session), json).await?;
        debug!("Saved draft for session {session} at step {}", draft.step);
        Ok(())
    }

    /// Returns `None` when nothing is stored. An unreadable value is treated
    /// the same way so a corrupted draft never locks the applicant out.
    pub async fn load(&self, session: Uuid) -> Result<Option<Draft>, DraftError> {
        let Some(json) = self.kv.get(&draft_key(session)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!("Discarding unreadable draft for session {session}: {e}");
                Ok(None)
            }
        }
    }

    pub async fn save_resume_meta(
        &self,
        session: Uuid,
        meta: &ResumeMeta,
    ) -> Result<(), DraftError> {
        let json = serde_json::to_string(meta)?;
        self.kv.set(&resume_meta_key(session), json).await
    }

    #[cfg(test)]
    pub async fn load_resume_meta(&self, session: Uuid) -> Result<Option<ResumeMeta>, DraftError> {
        let Some(json) = self.kv.get(&resume_meta_key(session)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&json).ok())
    }

    pub async fn clear_resume_meta(&self, session: Uuid) -> Result<(), DraftError> {
        self.kv.delete(&resume_meta_key(session)).await
    }

    /// Removes both keys of the session.
    pub async fn clear(&self, session: Uuid) -> Result<(), DraftError> {
        let _guard = self.lock(session).await;
        self.kv.delete(&draft_key(session)).await?;
        self.clear_resume_meta(session).await
    }
}
