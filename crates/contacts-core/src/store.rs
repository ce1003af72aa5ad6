//! Contact store
//!
//! The `ContactStore` owns the backing file and is the only component that
//! writes to it. It keeps nothing in memory between calls: every query
//! re-reads the file and every mutation re-writes it in full.
//!
//! ## Name semantics
//!
//! - Duplicate detection (`exists_by_name`, `append`) compares names exactly,
//!   so "Jane" and "jane" are distinct entries.
//! - Lookup (`find_by_name`) ignores case and returns the first match in
//!   insertion order.
//!
//! ## Usage
//!
//! ```ignore
//! let store = ContactStore::open()?;  // Creates data/contacts.json if missing
//!
//! store.append(Contact::new("Alice", "111"))?;
//! let alice = store.find_by_name("alice")?;
//! ```
//!
//! Appends through one store are serialized by a per-process write lock.
//! Separate processes writing the same file are last-write-wins.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Contact, ContactCollection};
use crate::storage::{JsonFilePersistence, LoadReport, StorageError, StorageResult};

/// Durable storage and lookup of the contact collection
pub struct ContactStore {
    /// Backing file handler
    persistence: JsonFilePersistence,
    /// Configuration
    config: Config,
    /// Held for the whole read-modify-write of an append
    write_lock: Mutex<()>,
}

impl ContactStore {
    /// Open the store from the default configuration
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config).context("Failed to open contact store")
    }

    /// Open the store with a specific configuration
    ///
    /// Creates the data directory and an empty backing file when missing.
    pub fn open_with_config(config: Config) -> StorageResult<Self> {
        let store = Self {
            persistence: JsonFilePersistence::new(config.contacts_path()),
            config,
            write_lock: Mutex::new(()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the data directory and backing file exist
    ///
    /// Idempotent. Returns `true` when the file was created by this call.
    pub fn initialize(&self) -> StorageResult<bool> {
        self.persistence.initialize()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load every contact in insertion order
    ///
    /// Malformed file content yields an empty collection (and a warning in
    /// the log). Use [`ContactStore::load_report`] to detect that case.
    pub fn load_all(&self) -> StorageResult<ContactCollection> {
        Ok(self.persistence.load()?.contacts)
    }

    /// Load every contact along with the corruption signal, if any
    pub fn load_report(&self) -> StorageResult<LoadReport> {
        self.persistence.load()
    }

    /// Find the first contact whose name matches, ignoring case
    ///
    /// Returns `None` when nothing matches.
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<Contact>> {
        let found = self
            .load_all()?
            .into_iter()
            .find(|contact| contact.name_matches(name));

        debug!("Lookup for {:?}: found={}", name, found.is_some());
        Ok(found)
    }

    /// Check whether a contact with exactly this name exists
    pub fn exists_by_name(&self, name: &str) -> StorageResult<bool> {
        Ok(self.load_all()?.iter().any(|contact| contact.name == name))
    }

    /// Add a contact at the end of the collection and persist it
    ///
    /// Fails with [`StorageError::MissingName`] for a blank name and
    /// [`StorageError::DuplicateName`] when the exact name is already
    /// stored. Readable records are carried forward. If any content could
    /// not be read, the file is backed up before being replaced.
    pub fn append(&self, contact: Contact) -> StorageResult<()> {
        if !contact.has_name() {
            return Err(StorageError::MissingName);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let LoadReport {
            mut contacts,
            corruption,
        } = self.persistence.load()?;

        if contacts.iter().any(|c| c.name == contact.name) {
            return Err(StorageError::DuplicateName { name: contact.name });
        }

        if corruption.is_some() && self.persistence.exists() {
            let backup = self.persistence.backup_corrupt()?;
            warn!(
                "Replacing malformed contacts file; previous content saved to {:?}",
                backup
            );
        }

        debug!("Appending contact {:?}", contact.name);
        contacts.push(contact);
        self.persist(&contacts)
    }

    /// Overwrite the backing file with the given collection
    pub fn persist(&self, contacts: &[Contact]) -> StorageResult<()> {
        self.persistence.save(contacts)
    }
}
