//! Output formatting

use clap::ValueEnum;
use formkit::{Form, Question};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Questions")]
    questions: usize,
    #[tabled(rename = "★")]
    favorite: &'static str,
    #[tabled(rename = "Locked")]
    locked: &'static str,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Form> for FormRow {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id().to_string(),
            title: form.title.clone(),
            questions: form.questions().len(),
            favorite: if form.is_favorite() { "★" } else { "" },
            locked: if form.is_protected() { "yes" } else { "" },
            updated: form.updated_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct QuestionRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Text")]
    text: String,
    #[tabled(rename = "Options")]
    options: String,
    #[tabled(rename = "Required")]
    required: &'static str,
}

impl QuestionRow {
    fn new(position: usize, question: &Question) -> Self {
        Self {
            position,
            id: question.id().to_string(),
            kind: question.question_type.to_string(),
            text: question.text.clone(),
            options: question.effective_options().join(", "),
            required: if question.is_required { "yes" } else { "" },
        }
    }
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
        }
    }

    pub fn print_forms(&self, forms: &[&Form]) {
        match self {
            OutputFormat::Table => {
                let mut table = Table::new(forms.iter().map(|f| FormRow::from(*f)));
                table.with(Style::rounded());
                println!("{table}");
            }
            _ => self.print(&forms),
        }
    }

    pub fn print_form(&self, form: &Form) {
        match self {
            OutputFormat::Table => {
                println!("{}", form.title);
                if !form.description.is_empty() {
                    println!("{}", form.description);
                }
                println!(
                    "id {}  created {}  updated {}",
                    form.id(),
                    form.created_at().format("%Y-%m-%d %H:%M:%S"),
                    form.updated_at().format("%Y-%m-%d %H:%M:%S"),
                );
                self.print_questions(form.questions());
            }
            _ => self.print(form),
        }
    }

    pub fn print_questions(&self, questions: &[Question]) {
        match self {
            OutputFormat::Table => {
                let rows = questions.iter().enumerate().map(|(i, q)| QuestionRow::new(i + 1, q));
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{table}");
            }
            _ => self.print(&questions),
        }
    }
}
