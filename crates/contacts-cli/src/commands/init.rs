//! Init command handler

use anyhow::{Context, Result};

use contacts_core::{Config, ContactStore};

use crate::output::{Output, OutputFormat};

/// Create the data directory and an empty contacts file if missing
pub fn init(config: Config, output: &Output) -> Result<()> {
    let path = config.contacts_path();
    let existed = path.exists();

    let store = ContactStore::open_with_config(config)
        .with_context(|| format!("Failed to initialize contacts file at {:?}", path))?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": store.path(),
                    "created": !existed
                })
            );
        }
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            if existed {
                output.message(&format!(
                    "Already initialized: {}",
                    store.path().display()
                ));
            } else {
                output.success(&format!(
                    "Created contacts file: {}",
                    store.path().display()
                ));
            }
        }
    }

    Ok(())
}
