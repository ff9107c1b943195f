//! Error types for the notecat application.
//!
//! This module defines the error taxonomy shared by the persistence medium,
//! the note store and the application controller.

use std::io;

use thiserror::Error;

/// The main error type for the notecat application.
#[derive(Error, Debug)]
pub enum NoteError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization outside of note records.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted record does not have the shape of a note.
    #[error("Corrupt note record at {key}: {reason}")]
    CorruptData { key: String, reason: String },

    /// The medium rejected a write because it would exceed its capacity.
    #[error("Storage is full ({requested} bytes requested, capacity {capacity} bytes). Delete some notes and try again.")]
    StorageFull {
        key: String,
        requested: u64,
        capacity: u64,
    },

    /// Note was not found when performing an operation that requires it.
    #[error("Note not found: {id}")]
    NotFound { id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The external editor could not be launched or failed.
    #[error("{message}")]
    Editor { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    Application { message: String },
}

impl NoteError {
    /// Builds a `CorruptData` error for the record stored under `key`.
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        NoteError::CorruptData {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn is_storage_full(&self) -> bool {
        matches!(self, NoteError::StorageFull { .. })
    }
}
