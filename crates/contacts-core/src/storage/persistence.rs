//! JSON backing-file persistence
//!
//! Handles creating, reading and writing the contacts file.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `./data/contacts.json` (configurable via `Config`)
//!
//! Malformed content is never an error. A file that is not valid JSON, or
//! whose top-level value is not an array, is normalized to an empty
//! collection. Inside an array, records without a string `name` are skipped
//! and the rest are kept. Both cases are reported through
//! [`LoadReport::corruption`] so callers can tell an empty directory from a
//! damaged one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{StorageError, StorageResult};
use crate::models::{Contact, ContactCollection};

/// Serialized form of an empty collection
const EMPTY_COLLECTION: &[u8] = b"[]";

/// What was wrong with a backing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corruption {
    /// The file that was read
    pub path: PathBuf,
    /// Human-readable reason, e.g. "expected a JSON array, found object"
    pub reason: String,
    /// Records dropped from an otherwise valid array; zero when the whole
    /// file was discarded
    pub skipped_records: usize,
}

impl Corruption {
    /// Whether nothing in the file could be used
    pub fn is_whole_file(&self) -> bool {
        self.skipped_records == 0
    }
}

/// Result of reading the backing file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Decoded contacts; empty when the whole file was unusable
    pub contacts: ContactCollection,
    /// Set when some or all of the file content could not be decoded
    pub corruption: Option<Corruption>,
}

impl LoadReport {
    /// Whether any of the file content had to be discarded
    pub fn is_corrupt(&self) -> bool {
        self.corruption.is_some()
    }
}

/// Persistence layer for the contacts file
///
/// Holds no data itself: every call goes to disk.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Create a persistence handler for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Ensure the containing directory and the backing file exist
    ///
    /// A missing file is created holding an empty collection. Existing
    /// content is never touched, so this is safe to call on every start.
    /// Returns `true` when the file was created.
    pub fn initialize(&self) -> StorageResult<bool> {
        ensure_parent_dir(&self.path)?;

        if self.exists() {
            debug!("Contacts file already present at {:?}", self.path);
            return Ok(false);
        }

        atomic_write(&self.path, EMPTY_COLLECTION)?;
        info!("Created empty contacts file at {:?}", self.path);
        Ok(true)
    }

    /// Read and decode the backing file
    ///
    /// A missing file reads as an empty collection. Only I/O failures are
    /// errors; malformed content is reported through the returned
    /// [`LoadReport`].
    pub fn load(&self) -> StorageResult<LoadReport> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Contacts file {:?} not found, treating as empty", self.path);
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(StorageError::from_read(e, self.path.clone())),
        };

        let report = decode(&self.path, &bytes);
        if let Some(ref corruption) = report.corruption {
            if corruption.is_whole_file() {
                warn!(
                    "Contacts file {:?} is malformed ({}); treating it as empty",
                    corruption.path, corruption.reason
                );
            } else {
                warn!(
                    "Contacts file {:?} has unreadable records ({}); loaded {} contact(s)",
                    corruption.path,
                    corruption.reason,
                    report.contacts.len()
                );
            }
        }

        Ok(report)
    }

    /// Serialize the whole collection and overwrite the backing file
    pub fn save(&self, contacts: &[Contact]) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(contacts).map_err(|source| StorageError::Encode {
            path: self.path.clone(),
            source,
        })?;

        atomic_write(&self.path, &data)?;
        debug!("Wrote {} contact(s) to {:?}", contacts.len(), self.path);
        Ok(())
    }

    /// Path of the next corrupt-file backup
    ///
    /// The first backup is `<file>.corrupt.backup`; later ones get a counter
    /// suffix (`<file>.corrupt.backup.1`, `.2`, ...) so earlier backups are
    /// never overwritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut base = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        base.push(".corrupt.backup");

        let first = self.path.with_file_name(&base);
        if !first.exists() {
            return first;
        }

        (1u32..)
            .map(|n| {
                let mut name = base.clone();
                name.push(format!(".{}", n));
                self.path.with_file_name(name)
            })
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    /// Copy the current file aside before it gets overwritten
    ///
    /// Returns the backup location.
    pub fn backup_corrupt(&self) -> StorageResult<PathBuf> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|e| StorageError::from_io(e, backup.clone()))?;
        warn!("Backed up malformed contacts file to {:?}", backup);
        Ok(backup)
    }
}

/// Decode raw file content into a collection
///
/// Blank content is a freshly created file, not corruption.
fn decode(path: &Path, bytes: &[u8]) -> LoadReport {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return LoadReport::default();
    }

    let corrupt = |reason: String| LoadReport {
        contacts: Vec::new(),
        corruption: Some(Corruption {
            path: path.to_path_buf(),
            reason,
            skipped_records: 0,
        }),
    };

    let records = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            return corrupt(format!(
                "expected a JSON array, found {}",
                json_type(&other)
            ))
        }
        Err(e) => return corrupt(format!("invalid JSON: {}", e)),
    };

    let mut contacts = ContactCollection::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Contact>(record) {
            Ok(contact) => contacts.push(contact),
            Err(e) => skipped.push(format!("#{}: {}", index, e)),
        }
    }

    let corruption = (!skipped.is_empty()).then(|| Corruption {
        path: path.to_path_buf(),
        reason: format!(
            "skipped {} record(s) without a name ({})",
            skipped.len(),
            skipped.join("; ")
        ),
        skipped_records: skipped.len(),
    });

    LoadReport {
        contacts,
        corruption,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    ensure_parent_dir(path)?;

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
