use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SKILL_LEVELS: &[SkillLevel] = &[
    SkillLevel::Beginner,
    SkillLevel::Intermediate,
    SkillLevel::Expert,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

/// Metadata of the uploaded resume binary. Lives beside `resume_ref` and is
/// also mirrored under its own draft key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResumeMeta {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillEntry {
    #[serde(default)]
    pub id: Uuid,
    pub skill_name: String,
    #[serde(default)]
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EducationEntry {
    /// Identity token; stays attached to the entry across reorders and removals.
    #[serde(default)]
    pub id: Uuid,
    pub degree: String,
    pub college: String,
    pub start_year: String,
    pub end_year: String,
}

/// Staging area for a skill that has not been committed to `skills` yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SkillDraft {
    pub skill_name: String,
    pub level: SkillLevel,
}

/// Staging area for an education entry. Dates come from a date picker and are
/// reduced to four-digit years when committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EducationDraft {
    pub degree: String,
    pub college: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The single form record edited by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ApplicationRecord {
    pub resume_ref: Option<String>,
    pub resume_meta: Option<ResumeMeta>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
    pub draft_skill: SkillDraft,
    pub draft_education: EducationDraft,
}

/// Partial update of the directly editable fields. `None` leaves a field untouched.
///
/// The resume reference and both collections change only through upload
/// completion and the list editors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub draft_skill: Option<SkillDraft>,
    pub draft_education: Option<EducationDraft>,
}

/// What leaves the wizard on final submission. Staging fields are not part of it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Submission {
    pub resume_ref: String,
    pub resume_meta: Option<ResumeMeta>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
}

impl From<&ApplicationRecord> for Submission {
    fn from(record: &ApplicationRecord) -> Self {
        Submission {
            resume_ref: record.resume_ref.clone().unwrap_or_default(),
            resume_meta: record.resume_meta.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            skills: record.skills.clone(),
            education: record.education.clone(),
        }
    }
}
