//! Form commands

use colored::Colorize;
use formkit::{EntityId, FormManager, FormUseCases, FormsError};

use super::{ensure_saved, require_form};
use crate::output::OutputFormat;

pub fn list(manager: &mut FormManager, favorites: bool, format: OutputFormat) -> Result<(), String> {
    manager.fetch_forms();
    let forms = if favorites {
        manager.favorites()
    } else {
        manager.forms().iter().collect()
    };
    format.print_forms(&forms);
    Ok(())
}

pub fn show(manager: &FormManager, id: String, password: Option<String>, format: OutputFormat) -> Result<(), String> {
    let form = require_form(manager, &EntityId::from_string(id))?;
    if form.is_protected() && !manager.check_password(form, password.as_deref().unwrap_or("")) {
        return Err(FormsError::PasswordRequired(form.id().to_string()).to_string());
    }
    format.print_form(form);
    Ok(())
}

pub fn create(manager: &mut FormManager, title: String, description: String) -> Result<(), String> {
    let form = manager.create_form(&title, &description);
    ensure_saved(manager)?;
    println!("{} Created form {}", "✓".green(), form.id());
    Ok(())
}

pub fn rename(
    manager: &mut FormManager,
    id: String,
    title: Option<String>,
    description: Option<String>,
) -> Result<(), String> {
    let id = EntityId::from_string(id);
    require_form(manager, &id)?;
    manager.select_form(&id);
    manager.edit_current(|form| {
        if let Some(title) = title {
            form.title = title;
        }
        if let Some(description) = description {
            form.description = description;
        }
    });
    manager.update_form();
    ensure_saved(manager)?;
    println!("{} Updated form {}", "✓".green(), id);
    Ok(())
}

pub fn delete(manager: &mut FormManager, id: String) -> Result<(), String> {
    let id = EntityId::from_string(id);
    let existed = manager.find(&id).is_some();
    manager.delete_form(&id);
    ensure_saved(manager)?;
    if existed {
        println!("{} Deleted form {}", "✓".green(), id);
    } else {
        println!("{} No form {}, nothing to delete", "•".yellow(), id);
    }
    Ok(())
}

pub fn favorite(manager: &mut FormManager, id: String) -> Result<(), String> {
    let id = EntityId::from_string(id);
    let is_favorite = manager
        .toggle_favorite(&id)
        .ok_or_else(|| FormsError::FormNotFound(id.to_string()).to_string())?;
    ensure_saved(manager)?;
    let state = if is_favorite { "marked as favorite" } else { "removed from favorites" };
    println!("{} Form {} {}", "✓".green(), id, state);
    Ok(())
}
