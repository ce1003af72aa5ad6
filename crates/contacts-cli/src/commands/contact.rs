//! Contact command handlers

use anyhow::{anyhow, bail, Context, Result};

use contacts_core::{Contact, ContactStore, StorageError};

use crate::output::Output;

/// List all contacts in insertion order
pub fn list(store: &ContactStore, output: &Output) -> Result<()> {
    let report = store.load_report().context("Failed to load contacts")?;

    if let Some(ref corruption) = report.corruption {
        if corruption.is_whole_file() {
            output.warning(&format!(
                "Contacts file {} is malformed ({}). Showing no contacts; \
                 the next add will back it up and start fresh.",
                corruption.path.display(),
                corruption.reason
            ));
        } else {
            output.warning(&format!(
                "Contacts file {} is malformed: {}. Showing the readable ones; \
                 the next add will back the file up and drop the rest.",
                corruption.path.display(),
                corruption.reason
            ));
        }
    }

    output.print_contacts(&report.contacts)
}

/// Show a single contact, matched by name ignoring case
pub fn show(store: &ContactStore, name: String, output: &Output) -> Result<()> {
    let contact = store
        .find_by_name(&name)
        .context("Failed to look up contact")?
        .ok_or_else(|| anyhow!("Contact not found: {}", name))?;

    output.print_contact(&contact)
}

/// Add a new contact
pub fn add(
    store: &ContactStore,
    name: String,
    phone: Option<String>,
    fields: Vec<(String, String)>,
    output: &Output,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name must not be empty");
    }

    // Duplicate guard; append repeats it under the write lock
    if store.exists_by_name(&name)? {
        bail!("Name already registered: {}", name);
    }

    let mut contact = match phone {
        Some(phone) => Contact::new(name, phone),
        None => Contact::named(name),
    };
    for (key, value) in fields {
        contact.set_field(key, value);
    }

    match store.append(contact.clone()) {
        Ok(()) => {}
        Err(e @ StorageError::DuplicateName { .. }) => return Err(e.into()),
        Err(e) => return Err(e).context("Failed to add contact"),
    }

    output.success(&format!("Added contact: {}", contact.name));
    output.print_contact(&contact)
}

/// Parse a `key=value` pair given with `--field`
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field '{}': expected key=value", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid field '{}': key is empty", raw));
    }
    if key == "name" || key == "phone" {
        return Err(format!("use --{} instead of --field {}=...", key, key));
    }

    Ok((key.to_string(), value.to_string()))
}
