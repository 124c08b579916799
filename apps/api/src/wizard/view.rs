use serde::Serialize;
use uuid::Uuid;

use crate::models::application::{
    ApplicationRecord, EducationEntry, SkillEntry, SkillLevel, SKILL_LEVELS,
};
use crate::uploads::UploadStatus;
use crate::wizard::controller::{StepOutcome, WizardController};
use crate::wizard::steps::{indicator, StepIndicator, SUMMARY_STEP};
use crate::wizard::validation::FieldErrors;

/// Everything a client needs to render the active step.
#[derive(Debug, Serialize)]
pub struct WizardView {
    pub session_id: Uuid,
    pub step: u8,
    pub steps: Vec<StepIndicator>,
    pub record: ApplicationRecord,
    pub errors: FieldErrors,
    pub upload: UploadStatus,
    pub progress: u8,
    pub skill_levels: &'static [SkillLevel],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

/// Read-only recap shown on the summary and completed steps.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub resume_name: Option<String>,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
}

impl WizardView {
    pub fn new(session_id: Uuid, controller: &WizardController) -> Self {
        let record = controller.record();
        let summary = (controller.step() >= SUMMARY_STEP).then(|| Summary::from(record));
        Self {
            session_id,
            step: controller.step(),
            steps: indicator(controller.step()),
            record: record.clone(),
            errors: controller.errors().clone(),
            upload: controller.upload().clone(),
            progress: controller.progress(),
            skill_levels: SKILL_LEVELS,
            summary,
        }
    }
}

impl From<&ApplicationRecord> for Summary {
    fn from(record: &ApplicationRecord) -> Self {
        let full_name = [record.first_name.trim(), record.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Summary {
            full_name,
            email: record.email.clone(),
            phone: record.phone.clone(),
            resume_name: record.resume_meta.as_ref().map(|m| m.name.clone()),
            skills: record.skills.clone(),
            education: record.education.clone(),
        }
    }
}

/// Reply to a navigation request.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub advanced: bool,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub view: WizardView,
}

impl StepResponse {
    pub fn new(session_id: Uuid, controller: &WizardController, outcome: StepOutcome) -> Self {
        Self {
            advanced: matches!(outcome, StepOutcome::Moved { .. }),
            outcome,
            view: WizardView::new(session_id, controller),
        }
    }
}
