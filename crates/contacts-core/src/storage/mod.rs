//! Storage layer
//!
//! Handles the JSON backing file that holds the contact collection.
//!
//! ## Architecture
//!
//! - **Backing file**: a single JSON array, fully re-read on every query
//!   and fully re-written on every mutation
//! - **Errors**: I/O failures are typed and classified; malformed content
//!   is skipped (per record, or the whole file when it is not an array) and
//!   reported, not raised

pub mod error;
pub mod persistence;

pub use error::{ErrorKind, StorageError, StorageResult};
pub use persistence::{Corruption, JsonFilePersistence, LoadReport};
