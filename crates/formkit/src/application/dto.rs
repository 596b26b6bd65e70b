//! Commands accepted by the form manager

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::QuestionType;

/// Input of the add-question flow. The manager assigns the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<String>,
    pub is_required: bool,
}

impl NewQuestion {
    pub fn new(question_type: QuestionType, text: impl Into<String>) -> Self {
        Self {
            question_type,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }
}
