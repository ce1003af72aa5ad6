//! Contacts Core Library
//!
//! This crate provides the storage and query layer for a small contact
//! directory persisted to a single JSON file.
//!
//! # Architecture
//!
//! - **Backing file**: source of truth, a JSON array of contact objects
//!
//! There is no cache and no index: every query re-reads the file and every
//! mutation re-writes it.
//!
//! # Quick Start
//!
//! ```text
//! let store = ContactStore::open()?;
//!
//! // Add a contact (rejected if the exact name already exists)
//! store.append(Contact::new("Alice", "111"))?;
//!
//! // Query contacts
//! let all = store.load_all()?;
//! let alice = store.find_by_name("alice")?;
//! ```
//!
//! # Modules
//!
//! - `store`: Contact store (main entry point)
//! - `models`: Contact record and collection
//! - `storage`: Backing-file persistence and storage errors
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{Contact, ContactCollection};
pub use storage::{Corruption, ErrorKind, LoadReport, StorageError, StorageResult};
pub use store::ContactStore;
