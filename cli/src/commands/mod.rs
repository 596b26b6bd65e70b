//! CLI Commands

pub mod config;
pub mod forms;
pub mod password;
pub mod questions;

use std::path::Path;
use std::sync::Arc;

use formkit::{
    EntityId, FileKeyValueStore, Form, FormManager, FormStore, FormsError, SystemClock,
    UuidGenerator,
};

/// Open the form manager over the slot file in `data_dir`
pub fn open_manager(data_dir: &Path, slot: &str) -> FormManager {
    tracing::debug!("Using slot {} in {}", slot, data_dir.display());
    let kv = Arc::new(FileKeyValueStore::new(data_dir));
    FormManager::new(
        FormStore::with_slot(kv, slot),
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
    )
}

/// Turn a failed save into a command error
pub(crate) fn ensure_saved(manager: &FormManager) -> Result<(), String> {
    match manager.last_error() {
        Some(e) => Err(format!("Changes kept in memory but not saved: {}", e)),
        None => Ok(()),
    }
}

pub(crate) fn require_form<'a>(manager: &'a FormManager, id: &EntityId) -> Result<&'a Form, String> {
    manager
        .find(id)
        .ok_or_else(|| FormsError::FormNotFound(id.to_string()).to_string())
}
