//! Load → apply → persist. Persistence is an explicit step after each
//! mutation, never a side effect of the controller itself.

use uuid::Uuid;

use crate::drafts::DraftStore;
use crate::errors::AppError;
use crate::wizard::controller::{WizardController, WizardError};

/// Rehydrates the session's wizard, or starts an empty one.
pub async fn load(drafts: &DraftStore, session: Uuid) -> Result<WizardController, AppError> {
    Ok(match drafts.load(session).await? {
        Some(draft) => WizardController::restore(draft),
        None => WizardController::new(),
    })
}

pub async fn persist(
    drafts: &DraftStore,
    session: Uuid,
    controller: &WizardController,
) -> Result<(), AppError> {
    drafts.save(session, &controller.snapshot()).await?;
    Ok(())
}

/// Applies one mutation and writes the whole draft back under the session's
/// lock. The resume-meta key follows the record's metadata. Nothing is
/// written when `f` fails.
pub async fn mutate<R, F>(
    drafts: &DraftStore,
    session: Uuid,
    f: F,
) -> Result<(WizardController, R), AppError>
where
    F: FnOnce(&mut WizardController) -> Result<R, AppError>,
{
    let _guard = drafts.lock(session).await;
    let mut controller = load(drafts, session).await?;
    let meta_before = controller.record().resume_meta.clone();
    let out = f(&mut controller)?;
    persist(drafts, session, &controller).await?;

    let meta = &controller.record().resume_meta;
    if *meta != meta_before {
        match meta {
            Some(meta) => drafts.save_resume_meta(session, meta).await?,
            None => drafts.clear_resume_meta(session).await?,
        }
    }
    Ok((controller, out))
}

/// Like [`mutate`], for record edits: a completed application is frozen.
pub async fn edit<R, F>(
    drafts: &DraftStore,
    session: Uuid,
    f: F,
) -> Result<(WizardController, R), AppError>
where
    F: FnOnce(&mut WizardController) -> Result<R, AppError>,
{
    mutate(drafts, session, |controller| {
        if controller.is_completed() {
            return Err(WizardError::Completed.into());
        }
        f(controller)
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::drafts::{DraftError, KeyValueStore, MemoryKv};
    use crate::models::application::FieldEdit;
    use crate::uploads::{UploadCompletion, UploadStatus};

    fn drafts() -> DraftStore {
        DraftStore::new(Arc::new(MemoryKv::default()))
    }

    /// Yields to the scheduler after every read, so interleavings between
    /// concurrent requests actually happen.
    #[derive(Default)]
    struct YieldingKv(MemoryKv);

    #[async_trait]
    impl KeyValueStore for YieldingKv {
        async fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
            let value = self.0.get(key).await;
            tokio::task::yield_now().await;
            value
        }

        async fn set(&self, key: &str, value: String) -> Result<(), DraftError> {
            self.0.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), DraftError> {
            self.0.delete(key).await
        }
    }

    fn completion() -> UploadCompletion {
        UploadCompletion {
            url: "https://x/y.pdf".into(),
            name: "resume.pdf".into(),
            size: 1024,
            file_type: "application/pdf".into(),
        }
    }

    #[tokio::test]
    async fn test_mutation_is_written_through() {
        let drafts = drafts();
        let session = Uuid::new_v4();
        mutate(&drafts, session, |c| {
            c.edit(FieldEdit {
                first_name: Some("Ada".into()),
                ..Default::default()
            });
            Ok(())
        })
        .await
        .unwrap();

        let reloaded = load(&drafts, session).await.unwrap();
        assert_eq!(reloaded.record().first_name, "Ada");
    }

    #[tokio::test]
    async fn test_failed_mutation_is_not_written() {
        let drafts = drafts();
        let session = Uuid::new_v4();
        let result: Result<(WizardController, ()), AppError> = mutate(&drafts, session, |c| {
            c.edit(FieldEdit {
                email: Some("a@b.com".into()),
                ..Default::default()
            });
            Err(AppError::Validation("nope".into()))
        })
        .await;
        assert!(result.is_err());
        assert!(drafts.load(session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_starts_empty() {
        let controller = load(&drafts(), Uuid::new_v4()).await.unwrap();
        assert_eq!(controller, WizardController::new());
    }

    #[tokio::test]
    async fn test_concurrent_mutations_keep_both_changes() {
        let drafts = DraftStore::new(Arc::new(YieldingKv::default()));
        let session = Uuid::new_v4();
        let (_, ticket) = mutate(&drafts, session, |c| Ok(c.begin_upload("resume.pdf")))
            .await
            .unwrap();

        let (completed, edited) = tokio::join!(
            mutate(&drafts, session, |c| Ok(c.complete_upload(ticket, completion()))),
            edit(&drafts, session, |c| {
                c.edit(FieldEdit {
                    first_name: Some("Ada".into()),
                    ..Default::default()
                });
                Ok(())
            }),
        );
        assert!(completed.unwrap().1);
        edited.unwrap();

        let reloaded = load(&drafts, session).await.unwrap();
        assert_eq!(reloaded.record().first_name, "Ada");
        assert_eq!(reloaded.record().resume_ref.as_deref(), Some("https://x/y.pdf"));
        assert_eq!(reloaded.upload(), &UploadStatus::Complete);
    }

    #[tokio::test]
    async fn test_resume_meta_key_follows_record() {
        let drafts = drafts();
        let session = Uuid::new_v4();
        let (_, ticket) = mutate(&drafts, session, |c| Ok(c.begin_upload("resume.pdf")))
            .await
            .unwrap();
        assert!(drafts.load_resume_meta(session).await.unwrap().is_none());

        mutate(&drafts, session, |c| Ok(c.complete_upload(ticket, completion())))
            .await
            .unwrap();
        let meta = drafts.load_resume_meta(session).await.unwrap().unwrap();
        assert_eq!(meta.size, 1024);

        mutate(&drafts, session, |c| Ok(c.begin_upload("other.pdf")))
            .await
            .unwrap();
        assert!(drafts.load_resume_meta(session).await.unwrap().is_none());
    }
}
