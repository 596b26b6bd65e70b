//! Question commands

use colored::Colorize;
use formkit::{EntityId, FormManager, FormUseCases, FormsError, NewQuestion};

use super::{ensure_saved, require_form};
use crate::{output::OutputFormat, QuestionCommands};

pub fn handle(action: QuestionCommands, manager: &mut FormManager, format: OutputFormat) -> Result<(), String> {
    match action {
        QuestionCommands::Add { form_id, text, kind, options, required } => {
            let form_id = EntityId::from_string(form_id);
            require_form(manager, &form_id)?;
            if !kind.has_options() && !options.is_empty() {
                tracing::warn!("Options are ignored for {} questions", kind);
            }

            manager.select_form(&form_id);
            let question = manager
                .add_question(NewQuestion::new(kind, text).with_options(options).required(required))
                .ok_or("Could not add question")?;
            manager.update_form();
            ensure_saved(manager)?;
            println!("{} Added question {} to form {}", "✓".green(), question.id(), form_id);
        }
        QuestionCommands::List { form_id, password } => {
            let form = require_form(manager, &EntityId::from_string(form_id))?;
            if form.is_protected() && !manager.check_password(form, password.as_deref().unwrap_or("")) {
                return Err(FormsError::PasswordRequired(form.id().to_string()).to_string());
            }
            format.print_questions(form.questions());
        }
    }
    Ok(())
}
