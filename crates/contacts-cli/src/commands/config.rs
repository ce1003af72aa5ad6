//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use contacts_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
///
/// `config` is the configuration already loaded at startup, env overrides
/// included, so what is shown is what every other command runs with.
pub fn show(config: &Config, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "contacts_file": config.contacts_file,
                    "contacts_path": config.contacts_path(),
                    "log_level": config.log_level,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.contacts_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:      {}", config.data_dir.display());
            println!("  contacts_file: {}", config.contacts_file);
            println!(
                "  log_level:     {}",
                config.log_level.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  log_file:      {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Contacts file: {}", config.contacts_path().display());
            println!("Config file:   {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    mut config: Config,
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match key.as_str() {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir must not be empty");
            }
            config.data_dir = value.clone().into();
        }
        "contacts_file" => {
            if value.is_empty() {
                bail!("contacts_file must not be empty");
            }
            config.contacts_file = value.clone();
        }
        "log_level" => {
            config.log_level = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, contacts_file, log_level, log_file",
                key
            );
        }
    }

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
