//! Hand-off of the completed application. Delivery is outside this service;
//! the default sink only records the submission in the log.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::models::application::Submission;

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, session: Uuid, submission: &Submission) -> anyhow::Result<()>;
}

pub struct LogSubmissionSink;

#[async_trait]
impl SubmissionSink for LogSubmissionSink {
    async fn submit(&self, session: Uuid, submission: &Submission) -> anyhow::Result<()> {
        info!(
            "Final submission for session {session}: {} {} <{}>, {} skills, {} education entries",
            submission.first_name,
            submission.last_name,
            submission.email,
            submission.skills.len(),
            submission.education.len()
        );
        Ok(())
    }
}
