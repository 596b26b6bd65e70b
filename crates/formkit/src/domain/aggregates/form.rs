//! Form Aggregate
//!
//! Aggregate root owning an ordered list of questions plus favorite and
//! password metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::question::Question;
use crate::domain::value_objects::EntityId;

/// Form aggregate root
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "FormRecord")]
pub struct Form {
    id: EntityId,
    pub title: String,
    pub description: String,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_favorite: bool,
    /// Plaintext gate. Not a confidentiality boundary for stored data.
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

/// Stored shape of a form, before the aggregate invariants are restored
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormRecord {
    id: EntityId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    password: Option<String>,
}

impl From<FormRecord> for Form {
    /// Keeps the first question for each id and clamps `updated_at` to
    /// `created_at`.
    fn from(record: FormRecord) -> Self {
        let mut questions: Vec<Question> = Vec::with_capacity(record.questions.len());
        for question in record.questions {
            if questions.iter().any(|kept| kept.id() == question.id()) {
                tracing::warn!("Dropping duplicate question {} in form {}", question.id(), record.id);
                continue;
            }
            questions.push(question);
        }

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            questions,
            created_at: record.created_at,
            updated_at: record.updated_at.max(record.created_at),
            is_favorite: record.is_favorite,
            password: record.password,
        }
    }
}

impl Form {
    /// Create a new, empty form stamped at `now`
    pub fn create(
        id: EntityId,
        title: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            questions: vec![],
            created_at: now,
            updated_at: now,
            is_favorite: false,
            password: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn is_favorite(&self) -> bool { self.is_favorite }
    pub fn password(&self) -> Option<&str> { self.password.as_deref() }
    pub fn questions(&self) -> &[Question] { &self.questions }

    /// True when a non-empty password is set
    pub fn is_protected(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn question(&self, id: &EntityId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn question_mut(&mut self, id: &EntityId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id() == id)
    }

    /// First question id that appears more than once, if any
    pub fn duplicate_question(&self) -> Option<&EntityId> {
        self.questions
            .iter()
            .enumerate()
            .find(|(i, q)| self.questions[..*i].iter().any(|p| p.id() == q.id()))
            .map(|(_, q)| q.id())
    }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Append a question at the end of the form
    pub fn add_question(&mut self, question: Question) -> Result<(), FormError> {
        if self.question(question.id()).is_some() {
            return Err(FormError::DuplicateQuestion(question.id().to_string()));
        }
        self.questions.push(question);
        Ok(())
    }

    pub fn toggle_favorite(&mut self) -> bool {
        self.is_favorite = !self.is_favorite;
        self.is_favorite
    }

    /// `None` and `Some("")` both leave the form unprotected
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Exact plaintext comparison. A cleared password equals the empty string.
    pub fn check_password(&self, input: &str) -> bool {
        self.password.as_deref().unwrap_or("") == input
    }

    /// Refresh `updated_at`, never moving it before `created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Fail when two questions share an id
    pub fn validate(&self) -> Result<(), FormError> {
        match self.duplicate_question() {
            Some(id) => Err(FormError::DuplicateQuestion(id.to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("question {0} already exists in this form")]
    DuplicateQuestion(String),
}
