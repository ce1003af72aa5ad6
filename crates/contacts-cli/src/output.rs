//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde_json::Value;

use contacts_core::Contact;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single contact with all of its fields
    pub fn print_contact(&self, contact: &Contact) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                let extra: Vec<_> = contact
                    .extra
                    .iter()
                    .filter(|(key, _)| key.as_str() != "phone")
                    .collect();
                let width = extra
                    .iter()
                    .map(|(k, _)| k.chars().count())
                    .chain([5])
                    .max()
                    .unwrap_or(5);

                println!("{:<width$}  {}", "Name:", contact.name, width = width + 1);
                if let Some(phone) = phone_text(contact) {
                    println!("{:<width$}  {}", "Phone:", phone, width = width + 1);
                }
                for (key, value) in extra {
                    println!(
                        "{:<width$}  {}",
                        format!("{}:", key),
                        display_value(value),
                        width = width + 1
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(contact)?);
            }
            OutputFormat::Quiet => {
                println!("{}", contact.name);
            }
        }
        Ok(())
    }

    /// Print a list of contacts
    pub fn print_contacts(&self, contacts: &[Contact]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if contacts.is_empty() {
                    println!("No contacts yet.");
                    return Ok(());
                }
                for contact in contacts {
                    println!(
                        "{:<30} {}",
                        truncate(&contact.name, 30),
                        phone_text(contact).unwrap_or_default()
                    );
                }
                println!("\n{} contact(s)", contacts.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(contacts)?);
            }
            OutputFormat::Quiet => {
                for contact in contacts {
                    println!("{}", contact.name);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", msg);
        }
    }
}

/// Phone as shown to people: the string phone, or a hand-edited
/// non-string value rendered as text
fn phone_text(contact: &Contact) -> Option<String> {
    contact
        .phone
        .clone()
        .or_else(|| contact.field("phone").map(display_value))
}

/// Render a free-form field; strings are shown without quotes
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
