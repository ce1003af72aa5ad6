//! Logging setup
//!
//! `RUST_LOG` wins when set. Otherwise the level comes from the config
//! (`log_level`, default `warn`) and applies to both crates. Logs go to
//! stderr, or to `log_file` when configured.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use contacts_core::Config;

const DEFAULT_LEVEL: &str = "warn";

/// Build the filter directive used when `RUST_LOG` is absent
fn default_directive(config: &Config) -> String {
    let level = config.log_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    format!("contacts_core={},contacts_cli={}", level, level)
}

/// Initialize the global tracing subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    if let Some(ref log_path) = config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                debug!("Logging to {:?}", log_path);
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
