//! Field rules for the application record.
//!
//! Every field carries an ordered list of rules. Validation reports only the
//! first rule a field violates, and rules never look at more than one field.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::application::ApplicationRecord;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Resume,
    FirstName,
    LastName,
    Email,
    Phone,
    Skills,
    Education,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Resume,
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Skills,
        Field::Education,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Resume => "resume",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Skills => "skills",
            Field::Education => "education",
        }
    }
}

/// Field path → message of the first violated rule. Empty means valid.
///
/// Entry-level problems inside the collections use dotted paths such as
/// `education.1.start_year`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keeps the first message recorded for a path.
    fn report(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    /// Drops the error for `field` and every entry-level path below it.
    pub fn clear_field(&mut self, field: Field) {
        let key = field.key();
        let prefix = format!("{key}.");
        self.0
            .retain(|path, _| path != key && !path.starts_with(&prefix));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keeps only errors that belong to `fields`, entry-level paths included.
    pub fn retain_fields(&mut self, fields: &[Field]) {
        self.0.retain(|path, _| {
            let root = path.split_once('.').map_or(path.as_str(), |(root, _)| root);
            fields.iter().any(|field| field.key() == root)
        });
    }
}

#[cfg(test)]
impl FieldErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (path, message) in other.0 {
            self.report(path, message);
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Validates only the given subset of fields.
pub fn validate(fields: &[Field], record: &ApplicationRecord) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for &field in fields {
        check_field(field, record, &mut errors);
    }
    errors
}

/// Validates the whole record: the union of every field's rules.
pub fn validate_all(record: &ApplicationRecord) -> FieldErrors {
    validate(Field::ALL, record)
}

fn check_field(field: Field, record: &ApplicationRecord, errors: &mut FieldErrors) {
    let key = field.key();
    match field {
        Field::Resume => {
            let has_ref = record
                .resume_ref
                .as_deref()
                .is_some_and(|r| !r.trim().is_empty());
            if !has_ref {
                errors.report(key, "Resume is required");
            } else if record
                .resume_meta
                .as_ref()
                .is_some_and(|m| m.file_type != PDF_CONTENT_TYPE)
            {
                errors.report(key, "Only PDF files are allowed");
            }
        }
        Field::FirstName => {
            if record.first_name.chars().count() < 3 {
                errors.report(key, "Name must be at least 3 characters");
            }
        }
        // Free text.
        Field::LastName => {}
        Field::Email => {
            if record.email.is_empty() {
                errors.report(key, "Email is required");
            } else if !EMAIL_RE.is_match(&record.email) {
                errors.report(key, "Invalid email address");
            }
        }
        Field::Phone => {
            if record.phone.chars().count() < 10 {
                errors.report(key, "Phone number must be at least 10 digits");
            }
        }
        Field::Skills => {
            if record.skills.is_empty() {
                errors.report(key, "At least one skill is required");
            }
            for (i, skill) in record.skills.iter().enumerate() {
                if skill.skill_name.chars().count() < 2 {
                    errors.report(format!("{key}.{i}.skill_name"), "Enter a skill");
                }
            }
        }
        Field::Education => {
            if record.education.is_empty() {
                errors.report(key, "At least one education entry is required");
            }
            for (i, edu) in record.education.iter().enumerate() {
                if edu.degree.is_empty() {
                    errors.report(format!("{key}.{i}.degree"), "Degree is required");
                }
                if edu.college.is_empty() {
                    errors.report(format!("{key}.{i}.college"), "College is required");
                }
                if !is_four_digit_year(&edu.start_year) {
                    errors.report(
                        format!("{key}.{i}.start_year"),
                        "Start year must be a 4-digit year",
                    );
                }
                if !is_four_digit_year(&edu.end_year) {
                    errors.report(
                        format!("{key}.{i}.end_year"),
                        "End year must be a 4-digit year",
                    );
                }
            }
        }
    }
}

fn is_four_digit_year(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_digit())
}
