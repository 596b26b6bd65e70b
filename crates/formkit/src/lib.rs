//! Formkit Form Builder
//!
//! Local-first form builder core: surveys made of typed questions, kept in
//! memory and mirrored to a single slot of a durable key-value store.
//!
//! ## Architecture
//!
//! - **Domain Layer**: `Form` aggregate, `Question` entity, value objects, events
//! - **Application Layer**: `FormStore` (slot persistence) and `FormManager`
//!   (the only mutation surface)
//! - **Ports Layer**: key-value store, clock and id generator interfaces
//! - **Infrastructure Layer**: in-memory and file-backed adapters
//!
//! ## Features
//!
//! - Create, edit, list and delete forms
//! - Short answer, paragraph, multiple choice and checkbox questions
//! - Favorites
//! - Per-form password gate (plaintext, casual access only)
//! - Explicit change notifications for presentation code

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;

use thiserror::Error;

// Re-exports for convenience
pub use domain::aggregates::{Form, Question};
pub use domain::value_objects::{EntityId, QuestionType};
pub use domain::events::FormEvent;
pub use application::{FormManager, FormStore, NewQuestion, SubscriptionId, DEFAULT_SLOT};
pub use ports::inbound::FormUseCases;
pub use ports::outbound::{Clock, IdGenerator, KeyValueStore, StorageError};
pub use infrastructure::persistence::{FileKeyValueStore, InMemoryKeyValueStore};
pub use infrastructure::{SystemClock, UuidGenerator};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Password required for form {0}")]
    PasswordRequired(String),
}
