use log::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::{
    id_from_key, note_key, now_millis, parse_note_record, Note, NoteError, Result,
    StorageMedium, DEFAULT_TITLE, NOTE_KEY_PREFIX,
};

/// Medium key holding the id of the active note
pub const ACTIVE_NOTE_ID_KEY: &str = "notecat:active-note-id";

/// Manages the storage, retrieval and ordering of notes, and the persisted
/// active-note pointer.
///
/// The store is the only authority over note records; every read goes back to
/// the medium and is validated before it is handed out.
pub struct NoteStore<M: StorageMedium> {
    medium: M,
}

impl<M: StorageMedium> NoteStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Reads every note record, most recently updated first.
    ///
    /// Records are visited in key order and sorted with a stable sort, so
    /// repeated reads without mutation return the same order. Fails with
    /// `CorruptData` on the first record that is not a valid note.
    pub fn list_all(&self) -> Result<Vec<Note>> {
        trace!("Listing all notes");
        let mut notes = Vec::new();

        for key in self.medium.keys()? {
            if id_from_key(&key).is_none() {
                continue;
            }
            // A key listed a moment ago can only vanish through outside interference.
            let Some(raw) = self.medium.get_item(&key)? else {
                warn!("Key {} disappeared while listing notes", key);
                continue;
            };
            notes.push(parse_note_record(&key, &raw)?);
        }

        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        debug!("Listed {} notes", notes.len());
        Ok(notes)
    }

    /// Retrieves a note by its ID. Returns `Ok(None)` if no record exists.
    pub fn get(&self, id: &str) -> Result<Option<Note>> {
        let key = note_key(id);
        match self.medium.get_item(&key)? {
            Some(raw) => parse_note_record(&key, &raw).map(Some),
            None => {
                debug!("Note not found: {}", id);
                Ok(None)
            }
        }
    }

    /// Creates a new, unsaved note with a fresh random id.
    pub fn create(&self, title: Option<&str>) -> Note {
        let now = now_millis();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        };
        trace!("Created note {} (not yet saved)", note.id);
        note
    }

    /// Writes the note under its key, replacing any previous record.
    pub fn save(&mut self, note: &Note) -> Result<()> {
        debug!("Saving note: {}", note.id);
        let json = serde_json::to_string(note)?;

        self.medium
            .set_item(&note_key(&note.id), &json)
            .map_err(|e| {
                if e.is_storage_full() {
                    error!("Cannot save note {}: storage is full", note.id);
                } else {
                    error!("Failed to save note {}: {}", note.id, e);
                }
                e
            })?;

        info!("Note saved: {}", note.id);
        Ok(())
    }

    /// Removes a note record. Fails with `NotFound` if there is none.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let key = note_key(id);
        if self.medium.get_item(&key)?.is_none() {
            error!("Cannot delete note {}: not found", id);
            return Err(NoteError::NotFound { id: id.to_string() });
        }

        self.medium.remove_item(&key)?;
        info!("Note deleted: {}", id);
        Ok(())
    }

    /// The persisted active note id, or `None` if it was never set or was cleared.
    pub fn get_active_id(&self) -> Result<Option<String>> {
        Ok(self
            .medium
            .get_item(ACTIVE_NOTE_ID_KEY)?
            .filter(|id| !id.is_empty()))
    }

    pub fn set_active_id(&mut self, id: &str) -> Result<()> {
        debug!("Persisting active note id: {}", id);
        self.medium.set_item(ACTIVE_NOTE_ID_KEY, id)
    }

    pub fn clear_active_id(&mut self) -> Result<()> {
        debug!("Clearing active note id");
        self.medium.set_item(ACTIVE_NOTE_ID_KEY, "")
    }

    /// Bytes taken by note records (keys and values), excluding the active-id record.
    pub fn used_bytes(&self) -> Result<u64> {
        let mut total = 0u64;
        for key in self.medium.keys()? {
            if !key.starts_with(NOTE_KEY_PREFIX) {
                continue;
            }
            if let Some(value) = self.medium.get_item(&key)? {
                total += (key.len() + value.len()) as u64;
            }
        }
        Ok(total)
    }

    pub fn note_count(&self) -> Result<usize> {
        Ok(self
            .medium
            .keys()?
            .iter()
            .filter(|key| key.starts_with(NOTE_KEY_PREFIX))
            .count())
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.medium.capacity_bytes()
    }
}
