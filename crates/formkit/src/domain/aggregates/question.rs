//! Question entity
//!
//! A single prompt inside a form. Questions have no life of their own: they
//! are stored only as part of their owning form's question list.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EntityId, QuestionType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: EntityId,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub text: String,
    /// Only meaningful for multiple choice and checkboxes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub is_required: bool,
}

impl Question {
    /// Build a question. An empty option list is stored as `None`.
    pub fn new(
        id: EntityId,
        question_type: QuestionType,
        text: impl Into<String>,
        options: Vec<String>,
        is_required: bool,
    ) -> Self {
        Self {
            id,
            question_type,
            text: text.into(),
            options: if options.is_empty() { None } else { Some(options) },
            is_required,
        }
    }

    pub fn id(&self) -> &EntityId { &self.id }

    /// Options as a slice, empty when absent
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Options that will actually be shown for this question type
    pub fn effective_options(&self) -> &[String] {
        if self.question_type.has_options() {
            self.options()
        } else {
            &[]
        }
    }
}
