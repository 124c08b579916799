//! Moves the resume binary to the object store.
//!
//! Progress is reported per session through [`progress::UploadRegistry`];
//! completion hands back a retrieval URL which the wizard writes into the
//! record. A failed transfer is reported as data, never retried.

pub mod handlers;
pub mod progress;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::application::ResumeMeta;

pub use s3::S3ObjectStore;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("object store rejected the upload: {0}")]
    Store(String),

    #[error("failed to read the uploaded file: {0}")]
    Read(String),

    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge { limit: u64 },
}

/// Upload state of the resume, persisted with the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    /// `file_name` names the file in flight; the record's resume metadata is
    /// only written once the upload completes.
    Uploading {
        ticket: Uuid,
        #[serde(default)]
        file_name: String,
    },
    Complete,
    Failed {
        message: String,
    },
}

impl UploadStatus {
    pub fn is_pending(&self, ticket: Uuid) -> bool {
        matches!(self, UploadStatus::Uploading { ticket: pending, .. } if *pending == ticket)
    }
}

/// Payload of the completion signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadCompletion {
    pub url: String,
    pub name: String,
    pub size: u64,
    pub file_type: String,
}

impl UploadCompletion {
    pub fn meta(&self) -> ResumeMeta {
        ResumeMeta {
            name: self.name.clone(),
            size: self.size,
            file_type: self.file_type.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Binary object storage. Returns the retrieval URL of the stored object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, UploadError>;
}

/// Percentage of `sent` over `total`, clamped to 0–100. Unknown totals read as 0.
pub fn progress_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (sent.saturating_mul(100) / total).min(100) as u8
}

#[derive(Clone)]
pub struct UploadAdapter {
    store: Arc<dyn ObjectStore>,
    preset: String,
}

impl UploadAdapter {
    pub fn new(store: Arc<dyn ObjectStore>, preset: impl Into<String>) -> Self {
        Self {
            store,
            preset: preset.into(),
        }
    }

    /// Stores `file` under the upload preset and returns the completion payload.
    pub async fn upload(
        &self,
        session: Uuid,
        ticket: Uuid,
        file: &ResumeFile,
    ) -> Result<UploadCompletion, UploadError> {
        let key = object_key(&self.preset, session, ticket, &file.name);
        let url = self
            .store
            .put(&key, file.bytes.clone(), &file.content_type)
            .await?;
        info!(
            "Uploaded resume '{}' ({} bytes) for session {session}",
            file.name,
            file.bytes.len()
        );
        Ok(UploadCompletion {
            url,
            name: file.name.clone(),
            size: file.bytes.len() as u64,
            file_type: file.content_type.clone(),
        })
    }
}

fn object_key(preset: &str, session: Uuid, ticket: Uuid, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{preset}/{session}/{ticket}-{safe}")
}
