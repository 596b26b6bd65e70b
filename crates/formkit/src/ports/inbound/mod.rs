//! Inbound ports (Use case traits)
//!
//! The operation table presentation code drives. Every mutating call is
//! persisted before it returns; persistence failures land in `last_error`.

use crate::domain::aggregates::Form;
use crate::domain::value_objects::EntityId;

/// Form management use cases
pub trait FormUseCases {
    /// Reload the collection from storage
    fn fetch_forms(&mut self) -> &[Form];

    /// Create, select and persist a new empty form
    fn create_form(&mut self, title: &str, description: &str) -> Form;

    /// Write the current working copy back into the collection.
    /// Returns `false` when nothing is selected or the form no longer exists.
    fn update_form(&mut self) -> bool;

    /// Remove a form. Unknown ids are accepted silently.
    fn delete_form(&mut self, id: &EntityId);

    /// Flip the favorite flag. Returns the new value, `None` for unknown ids.
    fn toggle_favorite(&mut self, id: &EntityId) -> Option<bool>;

    /// Set or clear the password. Returns `false` for unknown ids.
    fn set_password(&mut self, id: &EntityId, password: Option<String>) -> bool;

    /// Compare `input` to the form's password without touching state
    fn check_password(&self, form: &Form, input: &str) -> bool {
        form.check_password(input)
    }
}
