//! Form store
//!
//! Mirrors the whole form collection into one named slot of a key-value
//! store as JSON.

use std::sync::Arc;

use crate::domain::aggregates::Form;
use crate::ports::outbound::{KeyValueStore, StorageError};

/// Slot name used when none is configured
pub const DEFAULT_SLOT: &str = "savedForms";

pub struct FormStore {
    kv: Arc<dyn KeyValueStore>,
    slot: String,
}

impl FormStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_slot(kv, DEFAULT_SLOT)
    }

    pub fn with_slot(kv: Arc<dyn KeyValueStore>, slot: impl Into<String>) -> Self {
        Self {
            kv,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Read the stored collection.
    ///
    /// A missing, unreadable or corrupt slot yields an empty collection; this
    /// never fails. Only the first form stored under each id is kept.
    pub fn load(&self) -> Vec<Form> {
        let bytes = match self.kv.get(&self.slot) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("No saved forms in slot {}", self.slot);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Could not read slot {}: {}", self.slot, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Form>>(&bytes) {
            Ok(stored) => {
                let mut forms: Vec<Form> = Vec::with_capacity(stored.len());
                for form in stored {
                    if forms.iter().any(|kept| kept.id() == form.id()) {
                        tracing::warn!("Dropping duplicate form {} in slot {}", form.id(), self.slot);
                        continue;
                    }
                    forms.push(form);
                }
                tracing::debug!("Loaded {} form(s) from slot {}", forms.len(), self.slot);
                forms
            }
            Err(e) => {
                tracing::warn!("Slot {} holds unreadable data, starting empty: {}", self.slot, e);
                Vec::new()
            }
        }
    }

    /// Serialize the full collection and overwrite the slot
    pub fn save(&self, forms: &[Form]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(forms)?;
        self.kv.set(&self.slot, &bytes)?;
        tracing::debug!("Saved {} form(s) to slot {}", forms.len(), self.slot);
        Ok(())
    }
}
