//! Password commands

use colored::Colorize;
use formkit::{EntityId, FormManager, FormUseCases, FormsError};

use super::{ensure_saved, require_form};
use crate::PasswordCommands;

pub fn handle(action: PasswordCommands, manager: &mut FormManager) -> Result<(), String> {
    match action {
        PasswordCommands::Set { id, value } => {
            let id = EntityId::from_string(id);
            let protected = value.as_deref().is_some_and(|v| !v.is_empty());
            if !manager.set_password(&id, value) {
                return Err(FormsError::FormNotFound(id.to_string()).to_string());
            }
            ensure_saved(manager)?;
            if protected {
                println!("{} Password set for form {}", "✓".green(), id);
            } else {
                println!("{} Password cleared for form {}", "✓".green(), id);
            }
        }
        PasswordCommands::Clear { id } => {
            let id = EntityId::from_string(id);
            if !manager.set_password(&id, None) {
                return Err(FormsError::FormNotFound(id.to_string()).to_string());
            }
            ensure_saved(manager)?;
            println!("{} Password cleared for form {}", "✓".green(), id);
        }
        PasswordCommands::Check { id, input } => {
            let form = require_form(manager, &EntityId::from_string(id))?;
            if manager.check_password(form, &input) {
                println!("{} Password accepted", "✓".green());
            } else {
                return Err("Password rejected".into());
            }
        }
    }
    Ok(())
}
