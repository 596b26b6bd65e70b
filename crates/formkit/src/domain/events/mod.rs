//! Domain Events
//!
//! Raised by the form manager after each operation so presentation code can
//! refresh without observing fields directly.

use chrono::{DateTime, Utc};
use crate::domain::value_objects::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    Loaded {
        count: usize,
    },

    Created {
        form_id: EntityId,
        created_at: DateTime<Utc>,
    },

    Updated {
        form_id: EntityId,
        updated_at: DateTime<Utc>,
    },

    Deleted {
        form_id: EntityId,
        existed: bool,
    },

    FavoriteToggled {
        form_id: EntityId,
        is_favorite: bool,
    },

    PasswordChanged {
        form_id: EntityId,
        protected: bool,
    },

    SelectionChanged {
        form_id: Option<EntityId>,
    },

    QuestionAdded {
        form_id: EntityId,
        question_id: EntityId,
    },

    PersistFailed {
        message: String,
    },
}

impl FormEvent {
    /// Form the event is about, if any
    pub fn form_id(&self) -> Option<&EntityId> {
        match self {
            Self::Created { form_id, .. }
            | Self::Updated { form_id, .. }
            | Self::Deleted { form_id, .. }
            | Self::FavoriteToggled { form_id, .. }
            | Self::PasswordChanged { form_id, .. }
            | Self::QuestionAdded { form_id, .. } => Some(form_id),
            Self::SelectionChanged { form_id } => form_id.as_ref(),
            Self::Loaded { .. } | Self::PersistFailed { .. } => None,
        }
    }
}
