//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use notecat::{
    MemoryMedium, Note, NoteView, Result, StorageMedium, TextStats, NOTE_KEY_PREFIX,
};

/// Everything a view was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    List {
        ids: Vec<String>,
        active: Option<String>,
    },
    Editor(String),
    HideEditor,
    Status(TextStats),
    ClearStatus,
}

/// A view that records calls into a shared log the test keeps a handle to.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_list(&self) -> Option<(Vec<String>, Option<String>)> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::List { ids, active } => Some((ids, active)),
            _ => None,
        })
    }

    pub fn status_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ViewEvent::Status(_)))
            .count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl NoteView for RecordingView {
    fn render_note_list(&mut self, notes: &[Note], active_id: Option<&str>) {
        self.push(ViewEvent::List {
            ids: notes.iter().map(|n| n.id.clone()).collect(),
            active: active_id.map(str::to_string),
        });
    }

    fn show_editor(&mut self, note: &Note) {
        self.push(ViewEvent::Editor(note.id.clone()));
    }

    fn hide_editor(&mut self) {
        self.push(ViewEvent::HideEditor);
    }

    fn update_status(&mut self, stats: &TextStats, _created_at: i64, _updated_at: i64) {
        self.push(ViewEvent::Status(*stats));
    }

    fn clear_status(&mut self) {
        self.push(ViewEvent::ClearStatus);
    }
}

/// Memory medium that counts writes to note records and remembers the last
/// value written to each.
#[derive(Debug, Clone, Default)]
pub struct CountingMedium {
    inner: MemoryMedium,
    pub note_writes: Arc<AtomicUsize>,
    pub last_written: Arc<Mutex<Option<String>>>,
}

impl CountingMedium {
    pub fn new(inner: MemoryMedium) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.note_writes.load(Ordering::SeqCst)
    }
}

impl StorageMedium for CountingMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.set_item(key, value)?;
        if key.starts_with(NOTE_KEY_PREFIX) {
            self.note_writes.fetch_add(1, Ordering::SeqCst);
            *self.last_written.lock().unwrap() = Some(value.to_string());
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner.remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }

    fn capacity_bytes(&self) -> u64 {
        self.inner.capacity_bytes()
    }

    fn used_bytes(&self) -> u64 {
        self.inner.used_bytes()
    }
}

/// A note with fixed timestamps, for seeding a store directly.
pub fn note_with(id: &str, title: &str, updated_at: i64) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: String::new(),
        created_at: 0,
        updated_at,
    }
}
