//! The wizard state machine: current step, the record, attached field errors
//! and the resume upload status.
//!
//! The controller is plain data. It never persists itself; callers snapshot it
//! into a [`Draft`] after every mutation (see `wizard::service`).

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::drafts::Draft;
use crate::models::application::{ApplicationRecord, FieldEdit};
use crate::uploads::{UploadCompletion, UploadStatus};
use crate::wizard::lists::{self, ListError};
use crate::wizard::steps::{self, Gate, COMPLETED_STEP, FIRST_STEP, SUMMARY_STEP};
use crate::wizard::validation::{validate, validate_all, Field, FieldErrors};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {0} does not exist")]
    UnknownStep(u8),

    #[error("the application has already been submitted")]
    Completed,

    #[error("final submission is only possible from the summary step")]
    NotOnSummary,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Moved { from: u8, to: u8 },
    Unchanged,
    Rejected { errors: FieldErrors },
}

impl StepOutcome {
    pub fn completed(&self) -> bool {
        matches!(self, StepOutcome::Moved { to, .. } if *to == COMPLETED_STEP)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardController {
    step: u8,
    record: ApplicationRecord,
    errors: FieldErrors,
    upload: UploadStatus,
    progress: u8,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            step: FIRST_STEP,
            record: ApplicationRecord::default(),
            errors: FieldErrors::default(),
            upload: UploadStatus::Idle,
            progress: 0,
        }
    }

    /// Rehydrates from a persisted draft.
    ///
    /// Scalars are copied; both collections are rebuilt by clearing and
    /// re-appending each persisted entry in order. The persisted step is kept
    /// unless the restored record fails the gate of an earlier step, in which
    /// case the wizard resumes there. Persisted errors outside the resumed
    /// step's gate are dropped.
    pub fn restore(draft: Draft) -> Self {
        let Draft {
            step,
            mut record,
            errors,
            upload,
            progress,
        } = draft;

        let skills = std::mem::take(&mut record.skills);
        for entry in skills {
            lists::append(&mut record.skills, entry);
        }
        let education = std::mem::take(&mut record.education);
        for entry in education {
            lists::append(&mut record.education, entry);
        }

        let mut controller = Self {
            step: FIRST_STEP,
            record,
            errors,
            upload,
            progress: progress.min(100),
        };
        let wanted = if steps::is_valid_step(step) {
            step
        } else {
            FIRST_STEP
        };
        controller.step = controller.furthest_reachable(wanted);
        // Only the shown step's errors stay attached.
        match steps::spec(controller.step).map(|s| s.gate) {
            Some(Gate::Fields(fields)) => controller.errors.retain_fields(fields),
            Some(Gate::FullRecord) => {}
            Some(Gate::Terminal) | None => controller.errors.clear(),
        }
        debug!(
            "Restored wizard at step {} (persisted {})",
            controller.step, step
        );
        controller
    }

    pub fn snapshot(&self) -> Draft {
        Draft {
            step: self.step,
            record: self.record.clone(),
            errors: self.errors.clone(),
            upload: self.upload.clone(),
            progress: self.progress,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn upload(&self) -> &UploadStatus {
        &self.upload
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_completed(&self) -> bool {
        self.step == COMPLETED_STEP
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Validates the current step's gate and moves forward on success.
    /// On failure the errors are attached and the step is unchanged.
    pub fn advance(&mut self) -> StepOutcome {
        if self.is_completed() {
            return StepOutcome::Unchanged;
        }
        let errors = self.gate_errors(self.step);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return StepOutcome::Rejected { errors };
        }
        let from = self.step;
        self.step = (self.step + 1).min(COMPLETED_STEP);
        self.errors.clear();
        StepOutcome::Moved { from, to: self.step }
    }

    pub fn back(&mut self) -> StepOutcome {
        if self.is_completed() || self.step <= FIRST_STEP {
            return StepOutcome::Unchanged;
        }
        let from = self.step;
        self.step -= 1;
        StepOutcome::Moved { from, to: self.step }
    }

    /// Jumps to step `n` from the step indicator.
    ///
    /// Backward jumps and revisits are unconditional. A forward jump passes
    /// through the gate of every step it skips and stops with the first
    /// failing gate's errors attached.
    pub fn go_to_step(&mut self, n: u8) -> Result<StepOutcome, WizardError> {
        if !steps::is_valid_step(n) {
            return Err(WizardError::UnknownStep(n));
        }
        if self.is_completed() {
            return Err(WizardError::Completed);
        }
        if n == self.step {
            return Ok(StepOutcome::Unchanged);
        }
        let from = self.step;
        if n < from {
            self.step = n;
            return Ok(StepOutcome::Moved { from, to: n });
        }
        for step in from..n {
            let errors = self.gate_errors(step);
            if !errors.is_empty() {
                self.errors = errors.clone();
                return Ok(StepOutcome::Rejected { errors });
            }
        }
        self.step = n;
        self.errors.clear();
        Ok(StepOutcome::Moved { from, to: n })
    }

    /// Re-validates the whole record from the summary step and completes the
    /// wizard on success.
    pub fn submit_final(&mut self) -> Result<StepOutcome, WizardError> {
        if self.is_completed() {
            return Err(WizardError::Completed);
        }
        if self.step != SUMMARY_STEP {
            return Err(WizardError::NotOnSummary);
        }
        Ok(self.advance())
    }

    fn gate_errors(&self, step: u8) -> FieldErrors {
        match steps::spec(step).map(|s| s.gate) {
            Some(Gate::Fields(fields)) => validate(fields, &self.record),
            Some(Gate::FullRecord) => validate_all(&self.record),
            Some(Gate::Terminal) | None => FieldErrors::default(),
        }
    }

    fn furthest_reachable(&self, target: u8) -> u8 {
        (FIRST_STEP..target)
            .find(|&step| !self.gate_errors(step).is_empty())
            .unwrap_or(target)
    }

    // ── Field edits ─────────────────────────────────────────────────────────

    /// Applies scalar and staging edits. Errors attached to edited fields are
    /// dropped so they can be re-checked on the next advance.
    pub fn edit(&mut self, edit: FieldEdit) {
        let FieldEdit {
            first_name,
            last_name,
            email,
            phone,
            draft_skill,
            draft_education,
        } = edit;
        let scalars = [
            (Field::FirstName, first_name, &mut self.record.first_name),
            (Field::LastName, last_name, &mut self.record.last_name),
            (Field::Email, email, &mut self.record.email),
            (Field::Phone, phone, &mut self.record.phone),
        ];
        for (field, value, slot) in scalars {
            if let Some(value) = value {
                *slot = value;
                self.errors.clear_field(field);
            }
        }
        if let Some(draft) = draft_skill {
            self.record.draft_skill = draft;
        }
        if let Some(draft) = draft_education {
            self.record.draft_education = draft;
        }
    }

    // ── List editors ────────────────────────────────────────────────────────

    /// Commits the skill staging area. `None` when the staging entry is incomplete.
    pub fn commit_skill(&mut self) -> Option<Uuid> {
        let entry = lists::stage_skill(&mut self.record.draft_skill)?;
        let id = lists::append(&mut self.record.skills, entry);
        self.errors.clear_field(Field::Skills);
        Some(id)
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<(), ListError> {
        lists::remove(&mut self.record.skills, index)?;
        self.errors.clear_field(Field::Skills);
        Ok(())
    }

    pub fn commit_education(&mut self) -> Option<Uuid> {
        let entry = lists::stage_education(&mut self.record.draft_education)?;
        let id = lists::append(&mut self.record.education, entry);
        self.errors.clear_field(Field::Education);
        Some(id)
    }

    pub fn remove_education(&mut self, index: usize) -> Result<(), ListError> {
        lists::remove(&mut self.record.education, index)?;
        self.errors.clear_field(Field::Education);
        Ok(())
    }

    pub fn reorder_education(&mut self, new_order: &[Uuid]) -> Result<(), ListError> {
        lists::apply_permutation(&mut self.record.education, new_order)?;
        // Entry-level error paths are positional.
        self.errors.clear_field(Field::Education);
        Ok(())
    }

    pub fn move_education(&mut self, active: Uuid, over: Option<Uuid>) -> bool {
        let moved = lists::move_entry(&mut self.record.education, active, over);
        if moved {
            self.errors.clear_field(Field::Education);
        }
        moved
    }

    // ── Resume upload ───────────────────────────────────────────────────────

    /// Registers a newly dropped file and returns its upload ticket.
    ///
    /// The newest upload wins: any earlier pending ticket is voided and the
    /// previous reference and metadata are dropped. Both are written again
    /// only by [`Self::complete_upload`].
    pub fn begin_upload(&mut self, file_name: impl Into<String>) -> Uuid {
        let ticket = Uuid::new_v4();
        self.record.resume_ref = None;
        self.record.resume_meta = None;
        self.upload = UploadStatus::Uploading {
            ticket,
            file_name: file_name.into(),
        };
        self.progress = 0;
        ticket
    }

    /// Applies the completion signal of the upload identified by `ticket`.
    /// Returns `false` when that upload has been superseded or cleared.
    pub fn complete_upload(&mut self, ticket: Uuid, completion: UploadCompletion) -> bool {
        if !self.upload.is_pending(ticket) {
            debug!("Discarding completion of stale upload {ticket}");
            return false;
        }
        self.record.resume_meta = Some(completion.meta());
        self.record.resume_ref = Some(completion.url);
        self.upload = UploadStatus::Complete;
        self.progress = 100;
        self.errors.clear_field(Field::Resume);
        true
    }

    pub fn fail_upload(&mut self, ticket: Uuid, message: impl Into<String>) -> bool {
        if !self.upload.is_pending(ticket) {
            return false;
        }
        self.upload = UploadStatus::Failed {
            message: message.into(),
        };
        self.progress = 0;
        true
    }

    pub fn clear_resume(&mut self) {
        self.record.resume_ref = None;
        self.record.resume_meta = None;
        self.upload = UploadStatus::Idle;
        self.progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{EducationDraft, SkillDraft, SkillLevel};
    use crate::wizard::validation::PDF_CONTENT_TYPE;
    use chrono::NaiveDate;

    fn completion(url: &str) -> UploadCompletion {
        UploadCompletion {
            url: url.into(),
            name: "resume.pdf".into(),
            size: 1024,
            file_type: PDF_CONTENT_TYPE.into(),
        }
    }

    fn with_resume() -> WizardController {
        let mut c = WizardController::new();
        let ticket = c.begin_upload("resume.pdf");
        assert!(c.complete_upload(ticket, completion("https://x/y.pdf")));
        c
    }

    fn fill_basic_info(c: &mut WizardController) {
        c.edit(FieldEdit {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            phone: Some("+91 98765 43210".into()),
            ..Default::default()
        });
    }

    fn add_skill(c: &mut WizardController, name: &str) {
        c.edit(FieldEdit {
            draft_skill: Some(SkillDraft {
                skill_name: name.into(),
                level: SkillLevel::Intermediate,
            }),
            ..Default::default()
        });
        c.commit_skill().expect("skill committed");
    }

    fn add_education(c: &mut WizardController, degree: &str) -> Uuid {
        c.edit(FieldEdit {
            draft_education: Some(EducationDraft {
                degree: degree.into(),
                college: "Greenfield University".into(),
                start_date: NaiveDate::from_ymd_opt(2016, 9, 1),
                end_date: NaiveDate::from_ymd_opt(2020, 6, 30),
            }),
            ..Default::default()
        });
        c.commit_education().expect("education committed")
    }

    /// A wizard sitting on the summary step with a complete record.
    fn at_summary() -> WizardController {
        let mut c = with_resume();
        fill_basic_info(&mut c);
        add_skill(&mut c, "Rust");
        add_education(&mut c, "BSc");
        for _ in 0..4 {
            assert!(matches!(c.advance(), StepOutcome::Moved { .. }));
        }
        assert_eq!(c.step(), SUMMARY_STEP);
        c
    }

    #[test]
    fn test_advance_blocked_without_resume() {
        let mut c = WizardController::new();
        let outcome = c.advance();
        assert_eq!(c.step(), 1);
        match outcome {
            StepOutcome::Rejected { errors } => {
                assert_eq!(errors.get("resume"), Some("Resume is required"))
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(c.errors().get("resume"), Some("Resume is required"));
    }

    #[test]
    fn test_advance_clears_errors_on_success() {
        let mut c = WizardController::new();
        c.advance();
        let ticket = c.begin_upload("resume.pdf");
        c.complete_upload(ticket, completion("https://x/y.pdf"));
        assert_eq!(c.advance(), StepOutcome::Moved { from: 1, to: 2 });
        assert!(c.errors().is_empty());
    }

    #[test]
    fn test_advance_only_checks_current_step() {
        let mut c = with_resume();
        c.advance();
        c.edit(FieldEdit {
            first_name: Some("Ada".into()),
            email: Some("not-an-email".into()),
            phone: Some("12345".into()),
            ..Default::default()
        });
        let StepOutcome::Rejected { errors } = c.advance() else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert!(errors.get("phone").is_some());
        assert!(errors.get("skills").is_none());
        assert_eq!(c.step(), 2);
    }

    #[test]
    fn test_edit_clears_error_of_edited_field() {
        let mut c = with_resume();
        c.advance();
        c.advance();
        assert!(c.errors().get("email").is_some());
        c.edit(FieldEdit {
            email: Some("ada@example.com".into()),
            ..Default::default()
        });
        assert!(c.errors().get("email").is_none());
        assert!(c.errors().get("phone").is_some());
    }

    #[test]
    fn test_back_floors_at_first_step() {
        let mut c = WizardController::new();
        assert_eq!(c.back(), StepOutcome::Unchanged);
        assert_eq!(c.step(), 1);

        let mut c = with_resume();
        c.advance();
        assert_eq!(c.back(), StepOutcome::Moved { from: 2, to: 1 });
    }

    #[test]
    fn test_back_needs_no_validation() {
        let mut c = at_summary();
        c.edit(FieldEdit {
            email: Some("broken".into()),
            ..Default::default()
        });
        assert!(matches!(c.back(), StepOutcome::Moved { from: 5, to: 4 }));
    }

    #[test]
    fn test_submit_final_completes() {
        let mut c = at_summary();
        let outcome = c.submit_final().unwrap();
        assert!(outcome.completed());
        assert!(c.is_completed());
    }

    #[test]
    fn test_submit_final_rejects_invalid_record() {
        let mut c = at_summary();
        c.edit(FieldEdit {
            phone: Some("123".into()),
            ..Default::default()
        });
        let outcome = c.submit_final().unwrap();
        assert!(matches!(outcome, StepOutcome::Rejected { .. }));
        assert_eq!(c.step(), SUMMARY_STEP);
        assert!(c.errors().get("phone").is_some());
    }

    #[test]
    fn test_submit_final_only_from_summary() {
        let mut c = with_resume();
        assert_eq!(c.submit_final(), Err(WizardError::NotOnSummary));
    }

    #[test]
    fn test_terminal_step_is_final() {
        let mut c = at_summary();
        c.submit_final().unwrap();
        assert_eq!(c.advance(), StepOutcome::Unchanged);
        assert_eq!(c.back(), StepOutcome::Unchanged);
        assert_eq!(c.go_to_step(2), Err(WizardError::Completed));
        assert_eq!(c.submit_final(), Err(WizardError::Completed));
        assert_eq!(c.step(), COMPLETED_STEP);
    }

    #[test]
    fn test_go_to_step_backward_is_unconditional() {
        let mut c = at_summary();
        c.edit(FieldEdit {
            first_name: Some("A".into()),
            ..Default::default()
        });
        assert_eq!(
            c.go_to_step(1).unwrap(),
            StepOutcome::Moved { from: 5, to: 1 }
        );
    }

    #[test]
    fn test_go_to_step_forward_checks_skipped_gates() {
        let mut c = with_resume();
        let outcome = c.go_to_step(4).unwrap();
        assert!(matches!(outcome, StepOutcome::Rejected { .. }));
        assert_eq!(c.step(), 1);
        assert!(c.errors().get("first_name").is_some());

        fill_basic_info(&mut c);
        add_skill(&mut c, "Rust");
        assert_eq!(
            c.go_to_step(4).unwrap(),
            StepOutcome::Moved { from: 1, to: 4 }
        );
    }

    #[test]
    fn test_go_to_unknown_step() {
        let mut c = WizardController::new();
        assert_eq!(c.go_to_step(0), Err(WizardError::UnknownStep(0)));
        assert_eq!(c.go_to_step(9), Err(WizardError::UnknownStep(9)));
    }

    #[test]
    fn test_commit_skill_resets_staging() {
        let mut c = WizardController::new();
        c.edit(FieldEdit {
            draft_skill: Some(SkillDraft {
                skill_name: "Go".into(),
                level: SkillLevel::Expert,
            }),
            ..Default::default()
        });
        assert!(c.commit_skill().is_some());
        let skills = &c.record().skills;
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_name, "Go");
        assert_eq!(skills[0].level, SkillLevel::Expert);
        assert_eq!(c.record().draft_skill.skill_name, "");
        assert_eq!(c.record().draft_skill.level, SkillLevel::Beginner);
    }

    #[test]
    fn test_commit_incomplete_staging_is_noop() {
        let mut c = WizardController::new();
        assert!(c.commit_skill().is_none());
        assert!(c.commit_education().is_none());
        assert!(c.record().skills.is_empty());
        assert!(c.record().education.is_empty());
    }

    #[test]
    fn test_education_move_and_reorder() {
        let mut c = WizardController::new();
        let a = add_education(&mut c, "BSc");
        let b = add_education(&mut c, "MSc");
        let d = add_education(&mut c, "PhD");

        assert!(c.move_education(d, Some(a)));
        let order: Vec<Uuid> = c.record().education.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![d, a, b]);

        c.reorder_education(&[a, b, d]).unwrap();
        assert_eq!(c.record().education[2].degree, "PhD");

        assert!(!c.move_education(a, None));
        assert!(c.reorder_education(&[a, b]).is_err());
    }

    #[test]
    fn test_remove_education() {
        let mut c = WizardController::new();
        add_education(&mut c, "BSc");
        let keep = add_education(&mut c, "MSc");
        c.remove_education(0).unwrap();
        assert_eq!(c.record().education.len(), 1);
        assert_eq!(c.record().education[0].id, keep);
        assert!(c.remove_education(5).is_err());
    }

    #[test]
    fn test_upload_completion_sets_reference() {
        let mut c = WizardController::new();
        let ticket = c.begin_upload("resume.pdf");
        assert_eq!(
            c.upload(),
            &UploadStatus::Uploading {
                ticket,
                file_name: "resume.pdf".into()
            }
        );
        assert!(c.record().resume_meta.is_none());
        assert!(c.complete_upload(
            ticket,
            UploadCompletion {
                url: "https://x/y.pdf".into(),
                name: "resume.pdf".into(),
                size: 1024,
                file_type: String::new(),
            }
        ));
        assert_eq!(c.record().resume_ref.as_deref(), Some("https://x/y.pdf"));
        let meta = c.record().resume_meta.as_ref().unwrap();
        assert_eq!(meta.name, "resume.pdf");
        assert_eq!(meta.size, 1024);
        assert_eq!(c.progress(), 100);

        c.clear_resume();
        assert!(c.record().resume_ref.is_none());
        assert!(c.record().resume_meta.is_none());
        assert_eq!(c.progress(), 0);
        assert_eq!(c.upload(), &UploadStatus::Idle);
    }

    #[test]
    fn test_reference_requires_completion_signal() {
        let mut c = WizardController::new();
        assert!(!c.complete_upload(Uuid::new_v4(), completion("https://x/y.pdf")));
        assert!(c.record().resume_ref.is_none());
    }

    #[test]
    fn test_newest_upload_wins() {
        let mut c = WizardController::new();
        let first = c.begin_upload("resume.pdf");
        let second = c.begin_upload("resume.pdf");

        assert!(!c.complete_upload(first, completion("https://x/first.pdf")));
        assert!(c.record().resume_ref.is_none());
        assert!(c.complete_upload(second, completion("https://x/second.pdf")));
        assert_eq!(c.record().resume_ref.as_deref(), Some("https://x/second.pdf"));

        // A late completion of the superseded upload changes nothing.
        assert!(!c.complete_upload(first, completion("https://x/first.pdf")));
        assert_eq!(c.record().resume_ref.as_deref(), Some("https://x/second.pdf"));
    }

    #[test]
    fn test_clear_voids_pending_upload() {
        let mut c = WizardController::new();
        let ticket = c.begin_upload("resume.pdf");
        c.clear_resume();
        assert!(!c.complete_upload(ticket, completion("https://x/y.pdf")));
        assert!(c.record().resume_ref.is_none());
    }

    #[test]
    fn test_failed_upload_state() {
        let mut c = WizardController::new();
        let ticket = c.begin_upload("resume.pdf");
        assert!(c.fail_upload(ticket, "Upload failed"));
        assert_eq!(
            c.upload(),
            &UploadStatus::Failed {
                message: "Upload failed".into()
            }
        );
        assert!(c.record().resume_ref.is_none());
        assert!(c.record().resume_meta.is_none());
        assert!(!c.fail_upload(ticket, "again"));
    }

    #[test]
    fn test_new_upload_drops_previous_metadata() {
        let mut c = with_resume();
        let ticket = c.begin_upload("second.pdf");
        assert!(c.record().resume_meta.is_none());
        assert!(c.fail_upload(ticket, "Upload failed"));
        assert!(c.record().resume_meta.is_none());
        assert!(matches!(c.advance(), StepOutcome::Rejected { .. }));
        assert_eq!(c.errors().get("resume"), Some("Resume is required"));
    }

    #[test]
    fn test_restore_round_trips_snapshot() {
        let c = at_summary();
        let restored = WizardController::restore(c.snapshot());
        assert_eq!(restored, c);
    }

    #[test]
    fn test_restore_clamps_to_failing_gate() {
        let mut c = at_summary();
        c.edit(FieldEdit {
            phone: Some("1".into()),
            ..Default::default()
        });
        let restored = WizardController::restore(c.snapshot());
        assert_eq!(restored.step(), 2);
    }

    #[test]
    fn test_restore_keeps_only_errors_of_resumed_step() {
        let mut draft = at_summary().snapshot();
        draft.record.phone = "1".into();
        draft.step = 4;
        draft.errors = validate(
            &[Field::Phone, Field::Education],
            &ApplicationRecord::default(),
        );
        assert!(draft.errors.get("education").is_some());

        let restored = WizardController::restore(draft);
        assert_eq!(restored.step(), 2);
        assert_eq!(
            restored.errors().get("phone"),
            Some("Phone number must be at least 10 digits")
        );
        assert!(restored.errors().get("education").is_none());
    }

    #[test]
    fn test_restore_assigns_missing_tokens() {
        let mut draft = at_summary().snapshot();
        draft.record.education[0].id = Uuid::nil();
        let restored = WizardController::restore(draft);
        assert!(!restored.record().education[0].id.is_nil());
        assert_eq!(restored.record().education.len(), 1);
    }

    #[test]
    fn test_restore_unknown_step_starts_over() {
        let draft = Draft {
            step: 42,
            ..Default::default()
        };
        assert_eq!(WizardController::restore(draft).step(), FIRST_STEP);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Action {
            Advance,
            Back,
            GoTo(u8),
            Edit(String),
        }

        fn arb_action() -> impl Strategy<Value = Action> {
            prop_oneof![
                Just(Action::Advance),
                Just(Action::Back),
                (0u8..8).prop_map(Action::GoTo),
                "[a-z@.]{0,12}".prop_map(Action::Edit),
            ]
        }

        proptest! {
            #[test]
            fn prop_step_stays_in_bounds(
                complete in any::<bool>(),
                actions in prop::collection::vec(arb_action(), 0..40),
            ) {
                let mut c = if complete { at_summary() } else { WizardController::new() };
                for action in actions {
                    let before = c.step();
                    match action {
                        Action::Advance => {
                            if let StepOutcome::Rejected { .. } = c.advance() {
                                prop_assert_eq!(c.step(), before);
                            }
                        }
                        Action::Back => {
                            c.back();
                        }
                        Action::GoTo(n) => {
                            let _ = c.go_to_step(n);
                        }
                        Action::Edit(email) => c.edit(FieldEdit {
                            email: Some(email),
                            ..Default::default()
                        }),
                    }
                    prop_assert!((FIRST_STEP..=COMPLETED_STEP).contains(&c.step()));
                }
            }

            #[test]
            fn prop_snapshot_round_trip(first_name in ".{0,8}", phone in "[0-9 +]{0,14}") {
                let mut c = at_summary();
                c.edit(FieldEdit {
                    first_name: Some(first_name),
                    phone: Some(phone),
                    ..Default::default()
                });
                let restored = WizardController::restore(c.snapshot());
                prop_assert_eq!(restored.record(), c.record());
            }
        }
    }
}
