//! Application controller: keeps the in-memory note list and the active
//! selection consistent with the note store, and pushes state to the view.
//!
//! The note list held here is a cache. It is rebuilt from the store after
//! every mutating store call, and an edit is only considered saved once the
//! store accepted it.

use log::{debug, info, warn};

use crate::{now_millis, text_stats, Note, NoteStore, NoteView, Result, StorageMedium};

/// In-memory application state owned by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Cached notes, most recently updated first
    pub notes: Vec<Note>,
    /// Id of the note loaded in the editor
    pub active_note_id: Option<String>,
    /// Whether the active note has edits the store has not accepted yet
    pub dirty: bool,
}

impl AppState {
    pub fn active_note(&self) -> Option<&Note> {
        let id = self.active_note_id.as_deref()?;
        self.notes.iter().find(|note| note.id == id)
    }

    fn active_note_mut(&mut self) -> Option<&mut Note> {
        let id = self.active_note_id.as_deref()?;
        self.notes.iter_mut().find(|note| note.id == id)
    }
}

/// Which editor field an edit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Content,
}

pub struct Controller<M: StorageMedium, V: NoteView> {
    store: NoteStore<M>,
    view: V,
    state: AppState,
}

impl<M: StorageMedium, V: NoteView> Controller<M, V> {
    /// Loads notes and restores the active selection.
    ///
    /// A persisted active id that still resolves wins; otherwise the most
    /// recently updated note becomes active (and is persisted as such); with
    /// no notes at all nothing is active.
    pub fn load(store: NoteStore<M>, view: V) -> Result<Self> {
        let notes = store.list_all()?;
        let persisted = store.get_active_id()?;
        info!("Loaded {} notes", notes.len());

        let mut controller = Self {
            store,
            view,
            state: AppState {
                notes,
                active_note_id: None,
                dirty: false,
            },
        };

        let restored = match persisted.as_deref() {
            Some(id) if controller.store.get(id)?.is_some() => Some(id.to_string()),
            _ => None,
        };

        if let Some(id) = restored {
            debug!("Restoring active note {}", id);
            controller.select_note(&id)?;
        } else if let Some(first) = controller.state.notes.first().map(|n| n.id.clone()) {
            debug!("No usable active note, falling back to {}", first);
            controller.select_note(&first)?;
        } else {
            if persisted.is_some() {
                controller.store.clear_active_id()?;
            }
            controller.show_empty();
        }

        Ok(controller)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn notes(&self) -> &[Note] {
        &self.state.notes
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.state.active_note()
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.state.active_note_id.as_deref()
    }

    pub fn store(&self) -> &NoteStore<M> {
        &self.store
    }

    /// Makes `id` the active note. Unknown ids are ignored and `Ok(false)` is
    /// returned; a stale selection never fails.
    pub fn select_note(&mut self, id: &str) -> Result<bool> {
        if self.store.get(id)?.is_none() {
            debug!("Ignoring selection of unknown note {}", id);
            return Ok(false);
        }

        // Pending edits of the note being left are flushed before switching.
        self.save_active()?;

        self.store.set_active_id(id)?;
        self.state.active_note_id = Some(id.to_string());

        // The cache may predate this note (e.g. right after a save).
        if !self.state.notes.iter().any(|n| n.id == id) {
            self.reload_notes()?;
        }
        let Some(note) = self.state.active_note().cloned() else {
            warn!("Note {} missing from the reloaded cache", id);
            return Ok(false);
        };

        info!("Selected note {}", id);
        self.view.update_status(&text_stats(&note.content), note.created_at, note.updated_at);
        self.view
            .render_note_list(&self.state.notes, self.state.active_note_id.as_deref());
        self.view.show_editor(&note);
        Ok(true)
    }

    /// Creates, saves and selects a new note.
    ///
    /// Pending edits of the current note are flushed first; if that fails no
    /// note is created.
    pub fn new_note(&mut self, title: Option<&str>) -> Result<Note> {
        self.save_active()?;
        let note = self.store.create(title);
        self.store.save(&note)?;
        self.reload_notes()?;
        self.select_note(&note.id)?;
        Ok(note)
    }

    /// Deletes a note. A missing id fails with `NotFound`.
    ///
    /// Deleting the active note moves the selection to the most recently
    /// updated remaining note, or clears it when none remain.
    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        self.reload_notes()?;

        if self.state.active_note_id.as_deref() != Some(id) {
            self.render_list();
            return Ok(());
        }

        self.state.active_note_id = None;
        self.state.dirty = false;

        match self.state.notes.first().map(|n| n.id.clone()) {
            Some(next) => {
                self.select_note(&next)?;
            }
            None => {
                self.store.clear_active_id()?;
                self.show_empty();
            }
        }
        Ok(())
    }

    /// Instant edit path: applies an edit to the active note in memory.
    ///
    /// Returns `false` when there is no active note. Nothing is persisted;
    /// call `save_active` (usually debounced) for that.
    pub fn apply_edit(&mut self, target: EditTarget, text: &str) -> bool {
        let now = now_millis();
        let Some(note) = self.state.active_note_mut() else {
            debug!("Edit ignored, no active note");
            return false;
        };

        match target {
            EditTarget::Title => note.set_title(text, now),
            EditTarget::Content => note.set_content(text, now),
        }
        let (stats, created_at, updated_at) =
            (text_stats(&note.content), note.created_at, note.updated_at);

        self.state.dirty = true;
        self.state
            .notes
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        self.view.update_status(&stats, created_at, updated_at);
        self.render_list();
        true
    }

    pub fn on_title_changed(&mut self, text: &str) -> bool {
        self.apply_edit(EditTarget::Title, text)
    }

    pub fn on_content_changed(&mut self, text: &str) -> bool {
        self.apply_edit(EditTarget::Content, text)
    }

    /// Persists the active note if it has unsaved edits.
    ///
    /// Returns whether a save happened. On failure the note stays dirty and
    /// the error is returned untouched.
    pub fn save_active(&mut self) -> Result<bool> {
        if !self.state.dirty {
            return Ok(false);
        }
        let Some(note) = self.state.active_note().cloned() else {
            self.state.dirty = false;
            return Ok(false);
        };

        if let Err(e) = self.store.save(&note) {
            warn!("Active note {} kept unsaved: {}", note.id, e);
            return Err(e);
        }

        self.state.dirty = false;
        self.reload_notes()?;
        Ok(true)
    }

    /// Re-emits the status bar for the active note so relative dates stay current.
    pub fn refresh_dates(&mut self) {
        if let Some(note) = self.state.active_note() {
            let stats = text_stats(&note.content);
            self.view.update_status(&stats, note.created_at, note.updated_at);
        }
    }

    /// Re-renders every pane from the current state.
    pub fn render(&mut self) {
        self.render_list();
        match self.state.active_note().cloned() {
            Some(note) => {
                self.view.show_editor(&note);
                self.view
                    .update_status(&text_stats(&note.content), note.created_at, note.updated_at);
            }
            None => {
                self.view.hide_editor();
                self.view.clear_status();
            }
        }
    }

    pub fn used_bytes(&self) -> Result<u64> {
        self.store.used_bytes()
    }

    fn reload_notes(&mut self) -> Result<()> {
        let mut notes = self.store.list_all()?;

        // Unsaved edits of the active note survive a reload.
        if self.state.dirty {
            if let Some(active) = self.state.active_note().cloned() {
                if let Some(slot) = notes.iter_mut().find(|n| n.id == active.id) {
                    *slot = active;
                }
                notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            }
        }

        self.state.notes = notes;
        Ok(())
    }

    fn render_list(&mut self) {
        self.view
            .render_note_list(&self.state.notes, self.state.active_note_id.as_deref());
    }

    fn show_empty(&mut self) {
        self.state.active_note_id = None;
        self.view.hide_editor();
        self.view.clear_status();
        self.render_list();
    }
}
