//! Student roster model.

use super::{require_id, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable storage identifier for a student.
pub type StudentId = i64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Canonical student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Display name; falls back to `first_name last_name` when blank.
    pub name: String,
    pub tags: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    /// Empty when unknown.
    pub email: String,
}

impl Student {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("student id", self.id)?;
        validate_email(&self.email)
    }

    /// Returns the name shown in roster listings.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn apply(&mut self, patch: &StudentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(tags) = &patch.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            self.email = email.trim().to_string();
        }
    }
}

/// Input for creating a student. Every field may be empty except a valid email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub tags: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl StudentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)
    }
}

/// Partial student update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Trims, drops blanks and deduplicates tag values, keeping sorted order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Splits a comma-separated tag list as used by the record store.
pub fn split_tags(value: &str) -> Vec<String> {
    let parts = value.split(',').map(str::to_string).collect::<Vec<_>>();
    normalize_tags(&parts)
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || EMAIL_RE.is_match(trimmed) {
        return Ok(());
    }
    Err(ValidationError::InvalidEmail(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{split_tags, StudentDraft};

    #[test]
    fn split_tags_trims_and_dedups() {
        assert_eq!(
            split_tags(" honors, transfer,,honors "),
            vec!["honors".to_string(), "transfer".to_string()]
        );
    }

    #[test]
    fn empty_email_is_allowed_but_malformed_is_not() {
        let mut draft = StudentDraft::default();
        assert!(draft.validate().is_ok());
        draft.email = "not-an-email".to_string();
        assert!(draft.validate().is_err());
        draft.email = "ada@example.edu".to_string();
        assert!(draft.validate().is_ok());
    }
}
