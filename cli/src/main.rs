//! Formkit CLI
//!
//! Command-line host for the formkit form builder.
//!
//! # Usage
//!
//! ```bash
//! formkit create --title "Team survey" --description "Q3 check-in"
//! formkit question add <form-id> --kind multiple-choice --text "Office days?" --option 2 --option 3
//! formkit list --favorites
//! formkit password set <form-id> secret
//! formkit show <form-id> --password secret --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use formkit::{QuestionType, DEFAULT_SLOT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "formkit")]
#[command(author = "Formkit")]
#[command(version)]
#[command(about = "Build and manage survey forms", long_about = None)]
struct Cli {
    /// Directory holding saved forms
    #[arg(long, env = "FORMKIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage slot name
    #[arg(long, env = "FORMKIT_SLOT")]
    slot: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List forms
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Show a form and its questions
    Show {
        id: String,
        /// Required for password-protected forms
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a new form
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change a form's title or description
    Rename {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a form
    Delete { id: String },
    /// Toggle a form's favorite flag
    Favorite { id: String },
    /// Manage form passwords
    Password {
        #[command(subcommand)]
        action: PasswordCommands,
    },
    /// Manage questions
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum PasswordCommands {
    /// Set a password (omit the value to clear it)
    Set { id: String, value: Option<String> },
    /// Remove the password
    Clear { id: String },
    /// Check a candidate password
    Check { id: String, input: String },
}

#[derive(Subcommand)]
enum QuestionCommands {
    /// Append a question to a form
    Add {
        form_id: String,
        #[arg(long)]
        text: String,
        /// shortAnswer, paragraph, multipleChoice or checkboxes
        #[arg(long, default_value = "shortAnswer")]
        kind: QuestionType,
        /// Answer option (repeatable, multiple choice and checkboxes only)
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        required: bool,
    },
    /// List a form's questions
    List {
        form_id: String,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(level: Option<&str>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| level.map(String::from))
        .unwrap_or_else(|| "warn".into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let profile = cli.profile.as_deref();
    let config = config::Config::load(profile)?;
    init_tracing(config.log_level.as_deref());

    if let Commands::Config { action } = cli.command {
        return commands::config::handle(action, profile);
    }

    let format = match (cli.format, config.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => output::OutputFormat::from_str(name, true)
            .map_err(|e| format!("Invalid default_format in config: {}", e))?,
        (None, None) => output::OutputFormat::default(),
    };

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.resolve_data_dir()?,
    };
    let slot = cli.slot.or(config.slot).unwrap_or_else(|| DEFAULT_SLOT.to_string());
    let mut manager = commands::open_manager(&data_dir, &slot);

    match cli.command {
        Commands::List { favorites } => commands::forms::list(&mut manager, favorites, format),
        Commands::Show { id, password } => commands::forms::show(&manager, id, password, format),
        Commands::Create { title, description } => commands::forms::create(&mut manager, title, description),
        Commands::Rename { id, title, description } => commands::forms::rename(&mut manager, id, title, description),
        Commands::Delete { id } => commands::forms::delete(&mut manager, id),
        Commands::Favorite { id } => commands::forms::favorite(&mut manager, id),
        Commands::Password { action } => commands::password::handle(action, &mut manager),
        Commands::Question { action } => commands::questions::handle(action, &mut manager, format),
        Commands::Config { action } => commands::config::handle(action, profile),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
