//! Contacts CLI
//!
//! Command-line interface for the contact directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use contacts_core::{Config, ContactStore};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "contacts")]
#[command(about = "Contacts - a small file-backed contact directory")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and contacts file (first-time setup)
    Init,
    /// List all contacts
    #[command(alias = "ls")]
    List,
    /// Show contact details (name match ignores case)
    Show {
        /// Contact name
        name: String,
    },
    /// Add a new contact
    #[command(alias = "create")]
    Add {
        /// Contact name (must be unique, compared case-sensitively)
        #[arg(short, long)]
        name: String,
        /// Contact phone number (omitted from the record when not given)
        #[arg(short, long)]
        phone: Option<String>,
        /// Extra field as key=value (repeatable)
        #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = commands::contact::parse_field)]
        field: Vec<(String, String)>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, contacts_file, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config);

    // Commands that don't need the store
    match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, config, cli.config.as_ref(), &output);
        }
        Commands::Init => return commands::init::init(config, &output),
        _ => {}
    }

    let store = ContactStore::open_with_config(config).context("Failed to open contact store")?;

    match cli.command {
        Commands::List => commands::contact::list(&store, &output),
        Commands::Show { name } => commands::contact::show(&store, name, &output),
        Commands::Add { name, phone, field } => {
            commands::contact::add(&store, name, phone, field, &output)
        }
        Commands::Init | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config: Config,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(&config, config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(config, key, value, config_path, output)
        }
    }
}
