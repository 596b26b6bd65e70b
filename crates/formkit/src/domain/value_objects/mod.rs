//! Value Objects module
//!
//! Identifiers and the question type tag.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Identifier value object for forms and questions
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of answer a question expects.
///
/// Stored as a string tag. Decoding is lenient: a missing, null or unknown
/// tag becomes [`QuestionType::ShortAnswer`] instead of failing the whole
/// collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuestionType {
    #[default]
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Checkboxes,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::ShortAnswer,
        QuestionType::Paragraph,
        QuestionType::MultipleChoice,
        QuestionType::Checkboxes,
    ];

    /// Stable storage tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortAnswer => "shortAnswer",
            Self::Paragraph => "paragraph",
            Self::MultipleChoice => "multipleChoice",
            Self::Checkboxes => "checkboxes",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Whether `options` carries meaning for this type
    pub fn has_options(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Checkboxes)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    /// Strict parse. Accepts the storage tag or its kebab/snake spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == normalized)
            .ok_or_else(|| UnknownQuestionType(s.to_string()))
    }
}

impl Serialize for QuestionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = serde_json::Value::deserialize(deserializer)?;
        Ok(tag
            .as_str()
            .and_then(QuestionType::from_tag)
            .unwrap_or_default())
    }
}
