use log::{error, trace};
use serde_json::Value;

use crate::{Note, NoteError, Result};

/// Prefix of every note record key in the medium
pub const NOTE_KEY_PREFIX: &str = "note:";

/// The JSON type a note field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Timestamp,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Timestamp => value.is_i64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Timestamp => "an integer timestamp",
        }
    }
}

/// Required fields of a stored note, checked on every read path
pub const NOTE_SCHEMA: &[(&str, FieldKind)] = &[
    ("id", FieldKind::String),
    ("title", FieldKind::String),
    ("content", FieldKind::String),
    ("createdAt", FieldKind::Timestamp),
    ("updatedAt", FieldKind::Timestamp),
];

/// Medium key for the note with the given id
pub fn note_key(id: &str) -> String {
    format!("{}{}", NOTE_KEY_PREFIX, id)
}

/// Extracts the note id from a medium key, if it is a note key
pub fn id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(NOTE_KEY_PREFIX)
}

/// Checks a decoded value against `NOTE_SCHEMA`.
pub fn validate_note_shape(key: &str, value: &Value) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| NoteError::corrupt(key, "record is not a JSON object"))?;

    for (field, kind) in NOTE_SCHEMA {
        match object.get(*field) {
            None => {
                return Err(NoteError::corrupt(
                    key,
                    format!("missing required field `{}`", field),
                ))
            }
            Some(v) if !kind.matches(v) => {
                return Err(NoteError::corrupt(
                    key,
                    format!("field `{}` must be {}", field, kind.describe()),
                ))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Parses and validates a raw record read from the medium under `key`.
///
/// Any deviation from the note shape is reported as `CorruptData`; the record
/// is never repaired.
pub fn parse_note_record(key: &str, raw: &str) -> Result<Note> {
    trace!("Parsing note record at {}", key);

    let value: Value = serde_json::from_str(raw).map_err(|e| {
        error!("Record at {} is not valid JSON: {}", key, e);
        NoteError::corrupt(key, format!("invalid JSON: {}", e))
    })?;

    if let Err(e) = validate_note_shape(key, &value) {
        error!("{}", e);
        return Err(e);
    }

    let note: Note = serde_json::from_value(value)
        .map_err(|e| NoteError::corrupt(key, format!("cannot decode note: {}", e)))?;

    if let Some(expected) = id_from_key(key) {
        if note.id != expected {
            let error_msg = format!("record id `{}` does not match its key", note.id);
            error!("Corrupt record at {}: {}", key, error_msg);
            return Err(NoteError::corrupt(key, error_msg));
        }
    }

    Ok(note)
}
