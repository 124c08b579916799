use std::sync::Arc;

use crate::config::Config;
use crate::drafts::DraftStore;
use crate::parser::ResumeParserClient;
use crate::uploads::progress::UploadRegistry;
use crate::uploads::UploadAdapter;
use crate::wizard::submission::SubmissionSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub drafts: DraftStore,
    pub uploads: UploadAdapter,
    /// Live upload progress, in process only; never persisted.
    pub progress: UploadRegistry,
    pub parser: ResumeParserClient,
    /// Receives the record once the wizard completes.
    pub submissions: Arc<dyn SubmissionSink>,
    pub config: Config,
}
